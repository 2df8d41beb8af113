use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};

use hxpatch::app::App;
use hxpatch::buffer::{DumpReader, OffsetBase, PatchStream};
use hxpatch::ui::hex_dump;
use tempfile::NamedTempFile;

fn temp_file(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file
}

fn open_stream(file: &NamedTempFile) -> PatchStream<fs::File> {
    PatchStream::new(file.reopen().unwrap())
}

#[test]
fn scripted_session_patches_the_file() {
    let file = temp_file(b"Hello, this file is longer than one dump line.");
    let mut app = App::new(open_stream(&file));

    let script = "0\n68 69\n0x10\n 41 42 \nq\n";
    let mut output = Vec::new();
    app.run(script.as_bytes(), &mut output).unwrap();

    let contents = fs::read(file.path()).unwrap();
    assert_eq!(&contents[..5], b"hillo");
    assert_eq!(&contents[16..18], b"AB");

    let output = String::from_utf8(output).unwrap();
    let last_dump: Vec<&str> = output
        .lines()
        .filter(|l| l.len() == 78)
        .skip(6)
        .collect();
    assert!(last_dump[0].starts_with("00000000  68 69 6c 6c 6f"), "{output}");
    assert!(last_dump[1].starts_with("00000010  41 42"), "{output}");
}

#[test]
fn dump_pass_matches_one_shot_dump() {
    let data: Vec<u8> = (0..=255).cycle().take(5000).collect();
    let file = temp_file(&data);

    let mut reader = DumpReader::new(file.reopen().unwrap());
    let mut text = String::new();
    reader.read_to_string(&mut text).unwrap();
    assert_eq!(text, hex_dump(&data));
}

#[test]
fn write_then_seek_back_shows_patch_with_fresh_offsets() {
    let file = temp_file(b"0123456789abcdefHello, patch me!");
    let mut stream = open_stream(&file);

    stream.seek(SeekFrom::Start(16)).unwrap();
    stream.write_all(b"J").unwrap();
    assert_eq!(stream.stream_position().unwrap(), 16);

    let mut text = String::new();
    stream.pass().unwrap().read_to_string(&mut text).unwrap();
    assert!(text.starts_with("00000000  4a 65 6c 6c 6f"), "{text}");
    assert_eq!(fs::read(file.path()).unwrap()[16], b'J');
}

#[test]
fn seek_32_reads_relative_or_absolute() {
    let data: Vec<u8> = (0..64).collect();
    let file = temp_file(&data);

    let mut relative = open_stream(&file);
    relative.seek(SeekFrom::Start(32)).unwrap();
    let mut text = String::new();
    relative.pass().unwrap().read_to_string(&mut text).unwrap();
    assert!(text.starts_with("00000000  20 21"), "{text}");

    let mut absolute = open_stream(&file).offset_base(OffsetBase::Absolute);
    absolute.seek(SeekFrom::Start(32)).unwrap();
    let mut text = String::new();
    absolute.pass().unwrap().read_to_string(&mut text).unwrap();
    assert!(text.starts_with("00000020  20 21"), "{text}");
}
