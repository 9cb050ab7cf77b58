//! Data storage blobs written to and read back from real files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};

use port_storage::{DataStorage, FormatCheck, HEADER_SIZE, SegmentedMemory};

const MAGIC: u32 = 0x5054_0000;
const FLAGS: u32 = 0x0000_0003;

fn first() -> DataStorage {
    let mut storage = DataStorage::new();
    let root = storage.intern_string(c"root");
    let code = storage.intern_string(c"code");

    storage.add_property(Some(root), [0u32, 4].map(u32::to_le_bytes).concat());
    let section = storage.add_section(Some(code), (0u8..32).collect::<Vec<_>>());
    storage.add_symbol(Some(code), section, 16);
    storage.add_symbol(None, section, 32);
    storage
}

fn second() -> DataStorage {
    let mut storage = DataStorage::new();
    let name = storage.intern_string(c"data");
    storage.add_section(Some(name), *b"tail");
    storage
}

#[test]
fn chained_blobs_in_one_file() {
    let mut file = tempfile::tempfile().unwrap();
    {
        let mut writer = BufWriter::new(&mut file);
        first().write_to(&mut writer, MAGIC | FLAGS).unwrap();
        second().write_to(&mut writer, MAGIC).unwrap();
        writer.flush().unwrap();
    }

    file.seek(SeekFrom::Start(0)).unwrap();
    let mut reader = BufReader::new(&mut file);
    let check = FormatCheck::new(0xFFFF_0000, MAGIC);

    let (a, format_a) = DataStorage::read_from(&mut reader, check).unwrap();
    let (b, format_b) = DataStorage::read_from(&mut reader, check).unwrap();

    assert_eq!(a, first());
    assert_eq!(format_a & FLAGS, FLAGS);
    assert_eq!(b, second());
    assert_eq!(format_b, MAGIC);

    let end = reader.stream_position().unwrap();
    let expected = 2 * HEADER_SIZE as u64
        + u64::from(first().measure().unwrap())
        + u64::from(second().measure().unwrap());
    assert_eq!(end, expected);
}

#[test]
fn blob_inside_container() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(b"CONTAINER HEADER").unwrap();
    let full_size = first().write_to(&mut file, MAGIC).unwrap();
    file.write_all(b"trailer").unwrap();

    file.seek(SeekFrom::Start(16)).unwrap();
    assert_eq!(
        DataStorage::validate_from(&mut file, FormatCheck::exact(MAGIC)).unwrap(),
        MAGIC
    );
    assert_eq!(
        file.stream_position().unwrap(),
        16 + HEADER_SIZE as u64 + u64::from(full_size)
    );

    file.seek(SeekFrom::Start(16)).unwrap();
    let (storage, _) = DataStorage::read_from(&mut file, FormatCheck::exact(MAGIC)).unwrap();
    let memory = SegmentedMemory::from_storage(&storage).unwrap();
    assert_eq!(memory.bytes_at(memory.root).map(|b| b[0]), Some(4));
}

#[test]
fn wrong_magic_in_file() {
    let mut file: File = tempfile::tempfile().unwrap();
    second().write_to(&mut file, 0x1234_0000).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let err = DataStorage::read_from(&mut file, FormatCheck::new(0xFFFF_0000, MAGIC)).unwrap_err();
    assert_eq!(err.code(), 5);
}
