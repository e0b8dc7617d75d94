mod common;

use std::fs;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use nfs_fsh::{
    error::{Error, Result},
    export_alpha_bmp, export_bmp, extract_all, Archive, ExtractOptions,
};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn bits_per_pixel(path: &Path) -> Result<u16> {
    let data = fs::read(path)?;
    assert_eq!(&data[0..2], b"BM");
    assert_eq!(LittleEndian::read_u32(&data[2..6]) as usize, data.len());
    Ok(LittleEndian::read_u16(&data[28..30]))
}

fn file_names(paths: &[impl AsRef<Path>]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| p.as_ref().file_name()?.to_str().map(str::to_owned))
        .collect()
}

#[traced_test]
#[test]
fn extract_with_separate_alpha() -> Result<()> {
    let archive = Archive::parse(&common::track_archive())?;
    let dir = tempfile::tempdir()?;

    let written = extract_all(&archive, dir.path(), &ExtractOptions::default())?;

    assert_eq!(
        file_names(&written),
        vec![
            "idx0.bmp",
            "argb.bmp",
            "argb_a.bmp",
            "r565.bmp",
            "dxt1.bmp",
            "dxt1_a.bmp"
        ]
    );
    assert_eq!(bits_per_pixel(&dir.path().join("argb.bmp"))?, 24);
    assert_eq!(bits_per_pixel(&dir.path().join("argb_a.bmp"))?, 8);
    assert_eq!(fs::read(dir.path().join("idx0.bmp"))?.len(), 54 + 2 * 8);

    Ok(())
}

#[traced_test]
#[test]
fn extract_with_combined_alpha() -> Result<()> {
    let archive = Archive::parse(&common::track_archive())?;
    let dir = tempfile::tempdir()?;
    let options = ExtractOptions::builder().combine_alpha(true).build();

    let written = extract_all(&archive, dir.path(), &options)?;

    assert_eq!(written.len(), 4);
    assert_eq!(bits_per_pixel(&dir.path().join("argb.bmp"))?, 32);
    assert_eq!(bits_per_pixel(&dir.path().join("dxt1.bmp"))?, 32);
    assert_eq!(bits_per_pixel(&dir.path().join("r565.bmp"))?, 24);

    Ok(())
}

#[traced_test]
#[test]
fn extract_with_index_names() -> Result<()> {
    let archive = Archive::parse(&common::track_archive())?;
    let dir = tempfile::tempdir()?;
    let options = ExtractOptions::builder()
        .preserve_names(false)
        .combine_alpha(true)
        .build();

    let written = extract_all(&archive, dir.path(), &options)?;

    assert_eq!(
        file_names(&written),
        vec!["0000.bmp", "0001.bmp", "0002.bmp", "0003.bmp"]
    );

    Ok(())
}

#[traced_test]
#[test]
fn extract_refuses_to_overwrite() -> Result<()> {
    let archive = Archive::parse(&common::track_archive())?;
    let dir = tempfile::tempdir()?;

    extract_all(&archive, dir.path(), &ExtractOptions::default())?;
    assert!(matches!(
        extract_all(&archive, dir.path(), &ExtractOptions::default()),
        Err(Error::IOError(_))
    ));

    let options = ExtractOptions::builder().overwrite(true).build();
    assert_eq!(extract_all(&archive, dir.path(), &options)?.len(), 6);

    Ok(())
}

#[traced_test]
#[test]
fn extract_skips_undecodable_textures() -> Result<()> {
    let data = common::archive(&[
        (b"nopl", common::record(0x7B, 1, 1, &[0])),
        (b"ok\0\0", common::record(0x7F, 1, 1, &[1, 2, 3])),
    ]);
    let archive = Archive::parse(&data)?;
    let dir = tempfile::tempdir()?;

    let written = extract_all(&archive, dir.path(), &ExtractOptions::default())?;

    assert_eq!(file_names(&written), vec!["ok.bmp"]);
    assert!(!dir.path().join("nopl.bmp").exists());

    Ok(())
}

#[traced_test]
#[test]
fn alpha_names_do_not_clash_with_textures() -> Result<()> {
    let data = common::archive(&[
        (b"X\0\0\0", common::record(0x7D, 1, 1, &[1, 2, 3, 0x40])),
        (b"X_a\0", common::record(0x7F, 1, 1, &[4, 5, 6])),
    ]);
    let archive = Archive::parse(&data)?;
    let dir = tempfile::tempdir()?;

    let written = extract_all(&archive, dir.path(), &ExtractOptions::default())?;

    assert_eq!(file_names(&written), vec!["X.bmp", "X_a.bmp", "X_a_0001.bmp"]);
    assert_eq!(bits_per_pixel(&dir.path().join("X_a.bmp"))?, 8);
    assert_eq!(bits_per_pixel(&dir.path().join("X_a_0001.bmp"))?, 24);

    Ok(())
}

#[traced_test]
#[test]
fn alpha_names_avoid_earlier_textures() -> Result<()> {
    let data = common::archive(&[
        (b"X_a\0", common::record(0x7F, 1, 1, &[4, 5, 6])),
        (b"X\0\0\0", common::record(0x7D, 1, 1, &[1, 2, 3, 0x40])),
    ]);
    let archive = Archive::parse(&data)?;
    let dir = tempfile::tempdir()?;

    let written = extract_all(&archive, dir.path(), &ExtractOptions::default())?;

    assert_eq!(file_names(&written), vec!["X_a.bmp", "X_0001.bmp", "X_0001_a.bmp"]);
    assert_eq!(bits_per_pixel(&dir.path().join("X_a.bmp"))?, 24);

    Ok(())
}

#[traced_test]
#[test]
fn device_names_fall_back_to_index() -> Result<()> {
    let data = common::archive(&[(b"CON\0", common::record(0x7F, 1, 1, &[1, 2, 3]))]);
    let archive = Archive::parse(&data)?;
    let dir = tempfile::tempdir()?;

    let written = extract_all(&archive, dir.path(), &ExtractOptions::default())?;

    assert_eq!(file_names(&written), vec!["0000.bmp"]);

    Ok(())
}

#[traced_test]
#[test]
fn export_single_texture() -> Result<()> {
    let archive = Archive::parse(&common::track_archive())?;
    let dir = tempfile::tempdir()?;
    let argb = archive.by_name("argb")?;

    let path = dir.path().join("combined.bmp");
    export_bmp(argb, &path, true)?;
    let data = fs::read(&path)?;
    assert_eq!(LittleEndian::read_u16(&data[28..30]), 32);
    assert_eq!(data.len() - 54, 2 * 4);

    let path = dir.path().join("flat.bmp");
    export_bmp(argb, &path, false)?;
    assert_eq!(bits_per_pixel(&path)?, 24);

    let path = dir.path().join("alpha.bmp");
    export_alpha_bmp(argb, &path)?;
    let data = fs::read(&path)?;
    assert_eq!(&data[1078..1080], &[0x80, 0xFF]);

    Ok(())
}

#[traced_test]
#[test]
fn alpha_export_needs_alpha() -> Result<()> {
    let archive = Archive::parse(&common::track_archive())?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("r565_a.bmp");

    assert!(matches!(
        export_alpha_bmp(archive.by_name("r565")?, &path),
        Err(Error::MissingAlpha)
    ));
    assert!(!path.exists());

    Ok(())
}
