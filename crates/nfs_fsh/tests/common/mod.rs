#![allow(dead_code)]

/// Builds an entry header followed by its data
pub fn record(code: u32, width: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let mut out = code.to_le_bytes().to_vec();
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&[0; 8]);
    out.extend_from_slice(data);
    out
}

/// Lays out a PC archive with the entries stored in order behind the directory
pub fn archive(entries: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut offset = 16 + entries.len() * 8;
    let mut out = b"SHPI".to_vec();
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&(entries.len() as i32).to_le_bytes());
    out.extend_from_slice(b"GIMX");
    for (name, data) in entries {
        out.extend_from_slice(*name);
        out.extend_from_slice(&(offset as i32).to_le_bytes());
        offset += data.len();
    }
    for (_, data) in entries {
        out.extend_from_slice(data);
    }
    let size = out.len() as i32;
    out[4..8].copy_from_slice(&size.to_le_bytes());
    out
}

/// An archive mixing the common formats, two of which carry alpha
pub fn track_archive() -> Vec<u8> {
    #[rustfmt::skip]
    let dxt1 = [
        0x00, 0xF8, 0x00, 0xF8,
        0x00, 0x00, 0x00, 0x00,
    ];

    archive(&[
        (b"!pal", record(0x24, 2, 1, &[0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00])),
        (b"idx0", record(0x7B, 2, 2, &[0, 1, 1, 0])),
        (b"argb", record(0x7D, 2, 1, &[0x00, 0x00, 0xFF, 0x80, 0x00, 0xFF, 0x00, 0xFF])),
        (b"r565", record(0x78, 1, 1, &[0x1F, 0x00])),
        (b"dxt1", record(0x60, 4, 4, &dxt1)),
        (b"TXT ", record(0x6F, 2, 0, b"hi")),
    ])
}
