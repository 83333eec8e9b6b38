use specred::params::{evaluate_config_text, indexed_family, parse_literal, ParValue};
use specred::RdxError;

#[test]
fn test_nested_sections_are_evaluated() {
    let tree = evaluate_config_text(
        "[rdx]
    spectrograph = keck_lris_blue
    detnum = 1
[calibrations]
    bpm_usebias = True
    [[biasframe]]
        exprng = None, 1
    [[wavelengths]]
        reference = open
",
    )
    .unwrap();

    let rdx = tree.section("rdx").unwrap();
    assert_eq!(rdx.get("detnum"), Some(&ParValue::Int(1)));

    let calibrations = tree.section("calibrations").unwrap();
    assert_eq!(calibrations.get("bpm_usebias"), Some(&ParValue::Bool(true)));
    assert_eq!(
        calibrations.section("biasframe").unwrap().get("exprng"),
        Some(&ParValue::List(vec![ParValue::None, ParValue::Int(1)]))
    );
    assert_eq!(
        calibrations.section("wavelengths").unwrap().get("reference"),
        Some(&ParValue::Str("open".into()))
    );
    assert_eq!(
        tree.keys().collect::<Vec<_>>(),
        vec!["rdx", "calibrations"]
    );
}

#[test]
fn test_tuple_lists() {
    let err = evaluate_config_text("slits = (1,2), (3,4)\nbad = (1, x)").unwrap_err();
    assert!(matches!(err, RdxError::Eval(ref text) if text == "(1,x)"));

    let tree = evaluate_config_text("slits = (1,2), (3,4)").unwrap();
    assert_eq!(tree.get("slits").unwrap().to_string(), "[(1, 2), (3, 4)]");
}

#[test]
fn test_unparseable_values_stay_strings() {
    let tree = evaluate_config_text("a = bogus(\nb = 1.5e3\nc = 'quoted'").unwrap();
    assert_eq!(tree.get("a"), Some(&ParValue::Str("bogus(".into())));
    assert_eq!(tree.get("b"), Some(&ParValue::Float(1500.0)));
    assert_eq!(tree.get("c"), Some(&ParValue::Str("quoted".into())));
}

#[test]
fn test_literal_rejects_expressions() {
    assert!(parse_literal("1 + 2").is_err());
    assert!(parse_literal("__import__('os')").is_err());
    assert!(parse_literal("[1, [2, 3]]").is_ok());
}

#[test]
fn test_config_syntax_errors() {
    let err = evaluate_config_text("[a]\n[[[b]]]").unwrap_err();
    assert!(matches!(err, RdxError::ConfigSyntax { line: 2, .. }));

    let err = evaluate_config_text("[a]\nx = 1\nx = 2").unwrap_err();
    assert!(matches!(err, RdxError::ConfigSyntax { line: 3, .. }));
}

#[test]
fn test_detector_family() {
    let tree = evaluate_config_text(
        "[detectors]\n[[detector2]]\ngain = 1.2\n[[detector1]]\ngain = 1.1",
    )
    .unwrap();
    let detectors = tree.section("detectors").unwrap();
    let family = indexed_family(detectors, "detector").unwrap().unwrap();
    assert_eq!(family.len(), 2);
    assert_eq!(family[0].0, 1);
}
