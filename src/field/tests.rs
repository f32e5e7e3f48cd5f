#[cfg(test)]
use super::*;
#[cfg(test)]
use crate::ast::Scalar;

const X_COMPONENTS: [f64; 14] = [
    0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, -3.5, 4.0, 4.5, 1e-06, 5.5, 6.25, 7.0,
];

fn header(class: &str, format: &str, arch: Option<&str>) -> String {
    let arch = arch.map_or(String::new(), |a| format!("    arch        \"{}\";\n", a));
    format!(
        "FoamFile\n{{\n    version     2.0;\n    format      {};\n{}    class       {};\n    object      U;\n}}\n\n\
         dimensions      [0 1 -1 0 0 0 0];\n\n",
        format, arch, class
    )
}

const BOUNDARY: &str = "
boundaryField
{
    inlet
    {
        type            fixedValue;
        value           uniform 1;
    }
    outlet
    {
        type            zeroGradient;
    }
}
";

fn ascii_scalar_field() -> String {
    let mut text = header("volScalarField", "ascii", None);
    text.push_str("internalField   nonuniform List<scalar> \n14\n(\n");
    for x in X_COMPONENTS {
        text.push_str(&format!("{}\n", x));
    }
    text.push_str(")\n;\n");
    text.push_str(BOUNDARY);
    text
}

fn ascii_vector_field() -> String {
    let mut text = header("volVectorField", "ascii", None);
    text.push_str("internalField   nonuniform List<vector> \n14\n(\n");
    for (i, x) in X_COMPONENTS.iter().enumerate() {
        text.push_str(&format!("({} {} 0)\n", x, i));
    }
    text.push_str(")\n;\n");
    text.push_str(BOUNDARY);
    text
}

fn binary_scalar_field(big_endian: bool) -> Vec<u8> {
    let arch = if big_endian { "MSB;label=32;scalar=64" } else { "LSB;label=32;scalar=64" };
    let mut bytes = header("volScalarField", "binary", Some(arch)).into_bytes();
    bytes.extend_from_slice(b"internalField   nonuniform List<scalar> 14(");
    for x in X_COMPONENTS {
        if big_endian {
            bytes.extend_from_slice(&x.to_be_bytes());
        } else {
            bytes.extend_from_slice(&x.to_le_bytes());
        }
    }
    bytes.extend_from_slice(b")\n;\n");
    bytes.extend_from_slice(BOUNDARY.as_bytes());
    bytes
}

#[test]
fn test_field_class_names() {
    assert_eq!(FieldClass::from_class("volScalarField").unwrap(), FieldClass::Scalar);
    assert_eq!(FieldClass::from_class("surfaceVectorField").unwrap(), FieldClass::Vector);
    assert_eq!(FieldClass::from_class("pointSymmTensorField").unwrap(), FieldClass::SymmTensor);
    assert_eq!("volTensorField".parse::<FieldClass>().unwrap(), FieldClass::Tensor);
    assert_eq!(FieldClass::SymmTensor.class_name(), "volSymmTensorField");
    assert_eq!(FieldClass::Tensor.arity(), 9);

    let err = FieldClass::from_class("volBananaField").unwrap_err();
    assert!(matches!(err, FoamError::FieldClass { code: Some(501), .. }));
}

#[test]
fn test_arch_descriptor() {
    let arch: Arch = "LSB;label=32;scalar=64".parse().unwrap();
    assert!(!arch.big_endian);
    assert_eq!(arch.label_bits, 32);
    assert_eq!(arch.scalar_bits, 64);
    assert_eq!(arch.to_string(), "LSB;label=32;scalar=64");

    let err = "LSB;label=16;scalar=64".parse::<Arch>().unwrap_err();
    assert!(matches!(err, FoamError::Header { code: Some(503), .. }));
}

#[test]
fn test_ascii_scalar_field() {
    let field = FoamField::from_text(&ascii_scalar_field()).expect("Failed to decode field");
    let values = field.values().expect("Expected a nonuniform internal field");

    assert_eq!(field.class(), FieldClass::Scalar);
    assert_eq!(values.shape(), (14, 1));
    assert_eq!(values.as_slice(), &X_COMPONENTS);

    let inlet = field.tree.get("boundaryField").and_then(Node::as_dict).and_then(|b| b.get("inlet"));
    assert!(inlet.is_some(), "boundary section should be parsed");
}

#[test]
fn test_vector_first_column_matches_scalar_field() {
    let vectors = FoamField::from_text(&ascii_vector_field()).expect("Failed to decode vector field");
    let scalars = FoamField::from_text(&ascii_scalar_field()).expect("Failed to decode scalar field");

    let vector_values = vectors.values().unwrap();
    assert_eq!(vector_values.shape(), (14, 3));
    assert_eq!(vector_values.column(0), scalars.values().unwrap().as_slice());
    assert_eq!(vector_values.row(3), Some(&[1.5, 3.0, 0.0][..]));
}

#[test]
fn test_binary_and_ascii_decode_identically() {
    let ascii = FoamField::from_text(&ascii_scalar_field()).unwrap();
    let little = FoamField::from_bytes(&binary_scalar_field(false)).expect("Failed to decode LSB field");
    let big = FoamField::from_bytes(&binary_scalar_field(true)).expect("Failed to decode MSB field");

    assert_eq!(little.values(), ascii.values());
    assert_eq!(big.values(), ascii.values());
}

#[test]
fn test_binary_field_dumps_as_ascii() {
    let field = FoamField::from_bytes(&binary_scalar_field(false)).unwrap();
    let text = field.dump();

    assert!(text.contains("format      ascii;"));
    assert!(!text.contains("arch"));
    assert!(text.contains("internalField  nonuniform List<scalar> 14\n(\n"));

    let reread = FoamField::from_text(&text).expect("Failed to re-read dumped field");
    assert_eq!(reread.values(), field.values());
}

#[test]
fn test_binary_without_arch_is_header_error() {
    let mut bytes = header("volScalarField", "binary", None).into_bytes();
    bytes.extend_from_slice(b"internalField nonuniform List<scalar> 1(");
    bytes.extend_from_slice(&1.0f64.to_le_bytes());
    bytes.extend_from_slice(b");\n");

    let err = FoamField::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, FoamError::Header { .. }), "got {:?}", err);
}

#[test]
fn test_truncated_binary_payload() {
    let mut bytes = header("volScalarField", "binary", Some("LSB;label=32;scalar=64")).into_bytes();
    bytes.extend_from_slice(b"internalField nonuniform List<scalar> 3(");
    bytes.extend_from_slice(&1.0f64.to_le_bytes());
    bytes.extend_from_slice(&2.0f64.to_le_bytes());
    bytes.extend_from_slice(b");\n");

    match FoamField::from_bytes(&bytes) {
        Err(FoamError::PayloadSize { expected, found, .. }) => {
            assert_eq!(expected, 24);
            assert_eq!(found, 16);
        }
        other => panic!("Expected a payload size error, got {:?}", other),
    }
}

#[test]
fn test_ascii_count_mismatch() {
    let mut text = header("volScalarField", "ascii", None);
    text.push_str("internalField nonuniform List<scalar> 3(1 2);\n");

    let err = FoamField::from_text(&text).unwrap_err();
    assert!(matches!(err, FoamError::PayloadSize { expected: 3, found: 2, .. }));
}

#[test]
fn test_unknown_class_reported_before_payload() {
    let mut text = header("volWhateverField", "binary", None);
    text.push_str("internalField nonuniform List<scalar> 3(garbage);\n");

    let err = FoamField::from_text(&text).unwrap_err();
    assert!(matches!(err, FoamError::FieldClass { .. }));
}

#[test]
fn test_nonuniform_boundary_values_are_restored() {
    let mut text = header("volScalarField", "ascii", None);
    text.push_str("internalField nonuniform List<scalar> 2(1 2);\n\n");
    text.push_str(
        "boundaryField\n{\n    wall\n    {\n        type  fixedValue;\n        value nonuniform List<scalar> 3(4 5 6);\n    }\n}\n",
    );

    let field = FoamField::from_text(&text).unwrap();
    assert_eq!(field.values().unwrap().as_slice(), &[1.0, 2.0]);

    let wall = field.tree.get("boundaryField").and_then(Node::as_dict).and_then(|b| b.get("wall"));
    let value = wall.and_then(Node::as_dict).and_then(|w| w.get("value")).and_then(Node::as_value).unwrap();
    let list = value.value.as_list().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list.get(2), Some(&Node::Scalar(Scalar::Float(6.0))));
}

#[test]
fn test_uniform_field_takes_plain_parse() {
    let mut text = header("volScalarField", "ascii", None);
    text.push_str("internalField   uniform 0;\n");
    text.push_str(BOUNDARY);

    let field = FoamField::from_text(&text).unwrap();
    assert!(field.values().is_none());
    let internal = field.tree.get("internalField").and_then(Node::as_value).unwrap();
    assert_eq!(internal.name.as_deref(), Some("uniform"));
}

const CODE_P: &str = "FoamFile
{
    version     2.0;
    format      ascii;
    class       volScalarField;
    object      p;
}

dimensions  [0 2 -2 0 0 0 0];

internalField;

boundaryField
{
}
";

#[test]
fn test_new_field_layout() {
    let mut field = FoamField::new("p", FieldClass::Scalar, "m^2.s^-2").expect("Failed to build field");
    assert_eq!(field.dump(), CODE_P);

    field.set_uniform(2.0);
    assert_eq!(field.dump(), CODE_P.replace("internalField;", "internalField  uniform 2.0;"));
}

const CODE_NUT: &str = "FoamFile
{
    version     2.0;
    format      ascii;
    class       volScalarField;
    object      nut;
}

dimensions  [0 2 -1 0 0 0 0];

internalField  uniform 0;

boundaryField
{
    wall
    {
        type     nutkWallFunction;
        value    $internalField;
    }
    #includeEtc    \"caseDicts/setConstraintTypes\";
}
";

#[test]
fn test_boundaries_are_aligned_per_dict() {
    let mut field = FoamField::new("nut", FieldClass::Scalar, "m^2/s").unwrap();
    field.set_uniform(0);
    field.set_boundary(
        "wall",
        "nutkWallFunction",
        Some(Node::Scalar(Scalar::Macro("$internalField".into()))),
    );
    field
        .tree
        .get_mut("boundaryField")
        .and_then(Node::as_dict_mut)
        .unwrap()
        .insert("#includeEtc", Node::quoted("caseDicts/setConstraintTypes"));

    assert_eq!(field.dump(), CODE_NUT);
}

#[test]
fn test_set_values_writes_nonuniform_list() {
    let mut field = FoamField::new("U", FieldClass::Vector, "m/s").unwrap();
    field
        .set_values(FieldArray::from_rows(&[[1.0, 0.0, 0.0], [0.5, 0.25, 0.0]]))
        .expect("Failed to set values");

    let text = field.dump();
    assert!(text.contains("internalField  nonuniform List<vector> 2((1.0 0.0 0.0) (0.5 0.25 0.0));"));

    let reread = FoamField::from_text(&text).unwrap();
    assert_eq!(reread.values(), field.values());

    let err = field.set_values(FieldArray::scalars(vec![1.0])).unwrap_err();
    assert!(matches!(err, FoamError::PayloadSize { .. }));
}

#[test]
fn test_codestream_defaults() {
    let mut field = FoamField::new("T", FieldClass::Scalar, "K").unwrap();
    field.set_codestream("\n    scalarField t(mesh.nCells(), 300);\n    t.writeEntry(\"\", os);\n");

    let stream = match field.tree.get("internalField") {
        Some(Node::CodeStream(stream)) => stream,
        other => panic!("Expected a codeStream, got {:?}", other),
    };
    assert_eq!(stream.code_include(), Some(DEFAULT_CODE_INCLUDE));
    assert_eq!(stream.code_libs(), Some(DEFAULT_CODE_LIBS));
    assert_eq!(stream.code(), Some("scalarField t(mesh.nCells(), 300);\nt.writeEntry(\"\", os);"));

    let text = field.dump();
    assert!(text.contains("internalField  #codeStream\n{\n"));
    assert!(text.contains("    codeInclude\n    #{\n        #include \"fvCFD.H\"\n    #};"));
}

#[test]
fn test_field_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("U");
    std::fs::write(&path, ascii_vector_field()).unwrap();

    let field = FoamField::from_file(&path).expect("Failed to read field file");
    assert_eq!(field.values().unwrap().shape(), (14, 3));

    let missing = FoamField::from_file(dir.path().join("missing")).unwrap_err();
    assert!(matches!(missing, FoamError::File { code: Some(301), .. }));
}

/// Raw element bytes the way a solver writes them for the given `arch`.
fn encode(values: &[f64], big_endian: bool, bits: u32, label: bool) -> Vec<u8> {
    let mut out = Vec::new();
    for &x in values {
        let bytes = match (bits, label, big_endian) {
            (32, false, false) => (x as f32).to_le_bytes().to_vec(),
            (32, false, true) => (x as f32).to_be_bytes().to_vec(),
            (32, true, false) => (x as i32).to_le_bytes().to_vec(),
            (32, true, true) => (x as i32).to_be_bytes().to_vec(),
            (_, false, false) => x.to_le_bytes().to_vec(),
            (_, false, true) => x.to_be_bytes().to_vec(),
            (_, true, false) => (x as i64).to_le_bytes().to_vec(),
            (_, true, true) => (x as i64).to_be_bytes().to_vec(),
        };
        out.extend_from_slice(&bytes);
    }
    out
}

fn binary_field(class: &str, arch: &str, dtype: &str, count: usize, payload: &[u8]) -> Vec<u8> {
    let mut bytes = header(class, "binary", Some(arch)).into_bytes();
    bytes.extend_from_slice(format!("internalField   nonuniform List<{}> {}(", dtype, count).as_bytes());
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(b")\n;\n");
    bytes.extend_from_slice(BOUNDARY.as_bytes());
    bytes
}

#[test]
fn test_binary_single_precision_scalars() {
    for (arch, big_endian) in [("LSB;label=32;scalar=32", false), ("MSB;label=32;scalar=32", true)] {
        let payload = encode(&X_COMPONENTS, big_endian, 32, false);
        let bytes = binary_field("volScalarField", arch, "scalar", 14, &payload);
        let field = FoamField::from_bytes(&bytes).expect("Failed to decode single precision field");
        let values = field.values().unwrap();

        assert_eq!(values.shape(), (14, 1));
        for (got, want) in values.as_slice().iter().zip(X_COMPONENTS) {
            assert!((got - want).abs() <= 1e-6 * want.abs().max(1e-6), "{} vs {}", got, want);
        }
    }
}

#[test]
fn test_binary_vector_field_matches_ascii() {
    let ascii = FoamField::from_text(&ascii_vector_field()).unwrap();
    let expected = ascii.values().unwrap();

    for (arch, big_endian) in [("LSB;label=32;scalar=64", false), ("MSB;label=64;scalar=64", true)] {
        let payload = encode(expected.as_slice(), big_endian, 64, false);
        let bytes = binary_field("volVectorField", arch, "vector", 14, &payload);
        let field = FoamField::from_bytes(&bytes).expect("Failed to decode binary vector field");

        assert_eq!(field.class(), FieldClass::Vector);
        assert_eq!(field.values(), Some(expected));
    }
}

#[test]
fn test_binary_tensor_field() {
    let rows: Vec<f64> = (1..=18).map(|i| i as f64 * 0.5).collect();
    let payload = encode(&rows, true, 64, false);
    let bytes = binary_field("volTensorField", "MSB;label=32;scalar=64", "tensor", 2, &payload);

    let field = FoamField::from_bytes(&bytes).unwrap();
    let values = field.values().unwrap();
    assert_eq!(values.shape(), (2, 9));
    assert_eq!(values.row(1), Some(&rows[9..]));

    let reread = FoamField::from_text(&field.dump()).unwrap();
    assert_eq!(reread.values(), field.values());
}

#[test]
fn test_binary_label_lists() {
    let labels = [7.0, -2.0, 40000.0];
    for bits in [32, 64] {
        for big_endian in [false, true] {
            let arch = format!("{};label={};scalar=64", if big_endian { "MSB" } else { "LSB" }, bits);
            let mut bytes = header("volScalarField", "binary", Some(&arch)).into_bytes();
            bytes.extend_from_slice(b"internalField   nonuniform List<scalar> 2(");
            bytes.extend_from_slice(&encode(&[0.5, 1.5], big_endian, 64, false));
            bytes.extend_from_slice(b");\n\nboundaryField\n{\n    wall\n    {\n        type  fixedValue;\n");
            bytes.extend_from_slice(b"        faceLabels nonuniform List<label> 3(");
            bytes.extend_from_slice(&encode(&labels, big_endian, bits, true));
            bytes.extend_from_slice(b");\n    }\n}\n");

            let field = FoamField::from_bytes(&bytes).expect("Failed to decode label list");
            assert_eq!(field.values().unwrap().as_slice(), &[0.5, 1.5]);

            let wall = field.tree.get("boundaryField").and_then(Node::as_dict).and_then(|b| b.get("wall"));
            let value = wall.and_then(Node::as_dict).and_then(|w| w.get("faceLabels")).and_then(Node::as_value).unwrap();
            let list = value.value.as_list().unwrap();
            let expected: Vec<Node> = [7i64, -2, 40000].into_iter().map(Node::from).collect();
            assert_eq!(list.items, expected, "label={} big_endian={}", bits, big_endian);
        }
    }
}

#[test]
fn test_huge_declared_count_is_size_error() {
    let mut text = header("volVectorField", "ascii", None);
    text.push_str("internalField nonuniform List<vector> 9223372036854775807((1 0 0));\n");
    let err = FoamField::from_text(&text).unwrap_err();
    assert!(matches!(err, FoamError::PayloadSize { code: Some(507), .. }), "got {:?}", err);

    let mut bytes = header("volScalarField", "binary", Some("LSB;label=32;scalar=64")).into_bytes();
    bytes.extend_from_slice(b"internalField nonuniform List<scalar> 9223372036854775807(");
    bytes.extend_from_slice(&1.0f64.to_le_bytes());
    bytes.extend_from_slice(b");\n");
    let err = FoamField::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, FoamError::PayloadSize { code: Some(507), .. }), "got {:?}", err);
}

#[test]
fn test_ascii_data_error_positions() {
    let head = header("volScalarField", "ascii", None);
    let line = head.lines().count() + 1;

    let entry = "internalField nonuniform List<scalar> 3(1 2x 3);";
    let err = FoamField::from_text(&format!("{}{}\n", head, entry)).unwrap_err();
    assert!(matches!(err, FoamError::Grammar { code: Some(505), .. }), "got {:?}", err);
    assert_eq!(err.position(), Some((line, entry.find("2x").unwrap() + 1)));

    let entry = "internalField nonuniform List<scalar> 2(1 2";
    let err = FoamField::from_text(&format!("{}{}\n", head, entry)).unwrap_err();
    assert!(matches!(err, FoamError::Grammar { code: Some(506), .. }), "got {:?}", err);
    assert_eq!(err.position(), Some((line, entry.find('(').unwrap() + 1)));
}
