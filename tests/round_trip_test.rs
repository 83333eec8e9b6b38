use anyhow::Result;
use specred::log_capture::CaptureSink;
use specred::reduction_file::{
    find_block, interpret_data_block, parse_reduction_file, read_lines, write_reduction_file,
    DataBlock, ParseOptions, ReductionFileContents, DATA_BLOCK,
};
use specred::RdxError;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_written_data_files_read_back_in_order() -> Result<()> {
    let dir = tempdir()?;
    let out = dir.path().join("new.rdx");
    let sink = CaptureSink::new();

    let contents = ReductionFileContents::new(
        "shane_kast_blue",
        vec!["a.fits".to_string(), "b.fits".to_string()],
    );
    write_reduction_file(&out, &contents, &sink)?;
    assert!(sink.infos()[0].starts_with("Reduction file written to:"));

    let lines = read_lines(&out)?;
    let block = find_block(&lines, DATA_BLOCK)
        .block()
        .expect("data block was written");
    let data = interpret_data_block(block.lines(&lines), false, &sink)?;
    assert_eq!(
        data,
        DataBlock::Raw(vec![PathBuf::from("a.fits"), PathBuf::from("b.fits")])
    );
    Ok(())
}

#[test]
fn test_written_file_parses_with_config_and_setup() -> Result<()> {
    let dir = tempdir()?;
    let out = dir.path().join("full.rdx");
    let raw = dir.path().join("raw");
    std::fs::create_dir(&raw)?;
    std::fs::write(raw.join("b1.fits.gz"), b"")?;

    let contents = ReductionFileContents::new("shane_kast_blue", Vec::new())
        .with_cfg_lines(vec![
            "[rdx]".into(),
            "    spectrograph = shane_kast_blue".into(),
            "    detnum = 1".into(),
        ])
        .with_setup_lines(vec!["Setup A:".into()])
        .with_paths(vec![raw.display().to_string()])
        .with_table_rows(vec![
            "| filename | frametype |".into(),
            "| b1.fits.gz | arc |".into(),
        ]);
    write_reduction_file(&out, &contents, &CaptureSink::new())?;

    let parsed = parse_reduction_file(
        &out,
        &ParseOptions::default().with_runtime(true),
        &CaptureSink::new(),
    )?;
    assert_eq!(parsed.data_files, vec![raw.join("b1.fits.gz")]);
    assert_eq!(parsed.setup_names(), ["A"]);

    let params = parsed.parameters()?;
    let rdx = params.section("rdx").unwrap();
    assert_eq!(rdx.get("detnum").and_then(|v| v.as_int()), Some(1));
    Ok(())
}

#[test]
fn test_writer_rejects_multiline_entries() -> Result<()> {
    let dir = tempdir()?;
    let out = dir.path().join("bad.rdx");
    let contents =
        ReductionFileContents::new("shane_kast_blue", vec!["a.fits\nb.fits".to_string()]);

    let err = write_reduction_file(&out, &contents, &CaptureSink::new()).unwrap_err();
    assert!(matches!(err, RdxError::Type(_)));
    assert!(!out.exists());
    Ok(())
}

#[test]
fn test_written_entries_read_back_unchanged() -> Result<()> {
    let dir = tempdir()?;
    let sink = CaptureSink::new();

    let accepted = vec!["skipped.fits".to_string(), "data_end.fits".to_string()];
    let out = dir.path().join("ok.rdx");
    write_reduction_file(&out, &ReductionFileContents::new("x", accepted), &sink)?;
    let lines = read_lines(&out)?;
    let block = find_block(&lines, DATA_BLOCK).block().expect("data block");
    assert_eq!(
        interpret_data_block(block.lines(&lines), false, &sink)?.files(),
        [PathBuf::from("skipped.fits"), PathBuf::from("data_end.fits")]
    );

    for entry in ["run#1.fits", "skip b.fits", "data end", "|a.fits"] {
        let out = dir.path().join("rejected.rdx");
        let contents =
            ReductionFileContents::new("x", vec![entry.to_string(), "b.fits".to_string()]);
        let err = write_reduction_file(&out, &contents, &sink).unwrap_err();
        assert!(matches!(err, RdxError::Type(_)), "{entry:?} was written");
        assert!(!out.exists());
    }
    Ok(())
}
