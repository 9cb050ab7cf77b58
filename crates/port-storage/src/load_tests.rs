use std::io::{self, Cursor, Read, Seek, SeekFrom};

use crate::test_utils::{text, words};
use crate::{
    Corruption, DataStorage, FormatCheck, HEADER_SIZE, LoadError, NO_NAME, PAST_END, SectionId,
    StringId, TableKind,
};

const SKIP: u32 = 0xDEAD;

// Header words, then body words. Offsets are body-relative.
const HEADER_WORDS: usize = 16;
const STRINGS_AT: usize = HEADER_WORDS + 8;
const SECTION_TABLE_AT: usize = HEADER_WORDS + 11;
const SYMBOL_TABLE_AT: usize = HEADER_WORDS + 25;
const PROPERTY_TABLE_AT: usize = HEADER_WORDS + 36;

/// Hand-laid blob with gaps between regions.
#[rustfmt::skip]
fn fixture() -> Vec<u32> {
    vec![
        0x1BAD_C0DE, // format
        200,         // full_size
        3, 4,        // string table
        3, 144,      // property table
        2, 44,       // section table
        3, 100,      // symbol table
        11, 32,      // strings
        8, 180,      // properties
        32, 68,      // sections
        // body
        SKIP,
        3, 0, // "1st"
        6, 3, // "second"
        1, 9, // "3"
        SKIP,
        text(b"1sts"),
        text(b"econ"),
        text(b"d3+ "),
        0, 24, 0, // section 0
        1, 16, 16, // section 1
        0xAAAA_AAAA, 0xBBBB_BBBB, 0xCCCC_CCCC, 0xDDDD_DDDD,
        0xEEEE_EEEE, 0xFFFF_FFFF, 0x8888_8888, 0x7777_7777,
        2, 0, 4, // symbol 0
        1, 0, 24, // symbol 1
        0, 1, 0, // symbol 2
        SKIP,
        SKIP,
        1, 0, 0, // property 0
        1, 4, 0, // property 1
        2, 4, 4, // property 2
        0x1234_5678, 0x8765_4321,
    ]
}

fn load(blob: &[u32]) -> Result<(DataStorage, u32), LoadError> {
    DataStorage::read_from(&mut Cursor::new(words(blob)), FormatCheck::ANY)
}

fn load_err(blob: &[u32]) -> LoadError {
    load(blob).expect_err("blob should be rejected")
}

#[test]
fn load_fixture() {
    let (storage, format) = load(&fixture()).unwrap();

    assert_eq!(format, 0x1BAD_C0DE);

    let strings: Vec<&[u8]> = storage.strings.iter().map(|s| s.as_bytes()).collect();
    assert_eq!(strings, [&b"1st"[..], &b"second"[..], &b"3"[..]]);

    assert_eq!(storage.sections.len(), 2);
    assert_eq!(storage.sections[0].name, Some(StringId(0)));
    assert_eq!(storage.sections[1].name, Some(StringId(1)));
    assert_eq!(
        storage.sections[0].content,
        words(&[
            0xAAAA_AAAA,
            0xBBBB_BBBB,
            0xCCCC_CCCC,
            0xDDDD_DDDD,
            0xEEEE_EEEE,
            0xFFFF_FFFF
        ])
    );
    assert_eq!(
        storage.sections[1].content,
        words(&[0xEEEE_EEEE, 0xFFFF_FFFF, 0x8888_8888, 0x7777_7777])
    );

    let symbols: Vec<_> = storage
        .symbols
        .iter()
        .map(|s| (s.name, s.section, s.value))
        .collect();
    assert_eq!(
        symbols,
        [
            (Some(StringId(2)), SectionId(0), 4),
            (Some(StringId(1)), SectionId(0), 24),
            (Some(StringId(0)), SectionId(1), 0),
        ]
    );

    assert_eq!(storage.properties.len(), 3);
    assert_eq!(storage.properties[0].name, Some(StringId(1)));
    assert!(storage.properties[0].value.is_empty());
    assert_eq!(storage.properties[1].value, words(&[0x1234_5678]));
    assert_eq!(storage.properties[2].name, Some(StringId(2)));
    assert_eq!(storage.properties[2].value, words(&[0x8765_4321]));
}

#[test]
fn stream_ends_past_blob() {
    let mut cursor = Cursor::new(words(&fixture()));
    DataStorage::read_from(&mut cursor, FormatCheck::ANY).unwrap();

    assert_eq!(cursor.position(), (HEADER_SIZE + 200) as u64);
}

#[test]
fn offsets_are_relative_to_header_end() {
    let mut bytes = vec![0x55u8; 13];
    bytes.extend(words(&fixture()));

    let mut cursor = Cursor::new(bytes);
    cursor.seek(SeekFrom::Start(13)).unwrap();
    let (storage, _) = DataStorage::read_from(&mut cursor, FormatCheck::ANY).unwrap();

    assert_eq!(storage.strings[1].as_bytes(), b"second");
    assert_eq!(cursor.position(), (13 + HEADER_SIZE + 200) as u64);
}

#[test]
fn format_check() {
    let blob = words(&fixture());
    let read = |check| DataStorage::read_from(&mut Cursor::new(&blob), check);

    assert!(read(FormatCheck::exact(0x1BAD_C0DE)).is_ok());
    assert!(read(FormatCheck::new(0xFFFF_0000, 0x1BAD_0000)).is_ok());

    let err = read(FormatCheck::exact(0xDEAD_BEEF)).unwrap_err();
    assert!(matches!(
        err,
        LoadError::FormatMismatch {
            found: 0x1BAD_C0DE,
            ..
        }
    ));
    assert_eq!(err.code(), 5);
}

#[test]
fn invalid_header() {
    let mut blob = fixture();
    blob[1] = 100;

    let err = load_err(&blob);
    assert!(matches!(err, LoadError::Corrupted(Corruption::InvalidHeader)));
    assert_eq!(err.code(), 1);
}

#[test]
fn string_outside_contents() {
    let mut blob = fixture();
    blob[HEADER_WORDS + 5] = 3; // "3" grows past the 11 content bytes

    let err = load_err(&blob);
    assert!(matches!(
        err,
        LoadError::Corrupted(Corruption::BadEntry {
            table: TableKind::String,
            index: 2
        })
    ));
}

#[test]
fn section_with_missing_name() {
    let mut blob = fixture();
    blob[SECTION_TABLE_AT + 3] = 3;

    let err = load_err(&blob);
    assert!(matches!(
        err,
        LoadError::Corrupted(Corruption::BadEntry {
            table: TableKind::Section,
            index: 1
        })
    ));
}

#[test]
fn section_outside_contents() {
    let mut blob = fixture();
    blob[SECTION_TABLE_AT + 5] = 17;

    assert_eq!(load_err(&blob).code(), 1);
}

#[test]
fn unnamed_entries() {
    let mut blob = fixture();
    blob[SECTION_TABLE_AT] = NO_NAME;
    blob[SYMBOL_TABLE_AT] = NO_NAME;
    blob[PROPERTY_TABLE_AT + 6] = NO_NAME;

    let (storage, _) = load(&blob).unwrap();
    assert_eq!(storage.sections[0].name, None);
    assert_eq!(storage.symbols[0].name, None);
    assert_eq!(storage.properties[2].name, None);
}

#[test]
fn symbol_with_missing_section() {
    let mut blob = fixture();
    blob[SYMBOL_TABLE_AT + 7] = 2;

    let err = load_err(&blob);
    assert!(matches!(
        err,
        LoadError::Corrupted(Corruption::BadEntry {
            table: TableKind::Symbol,
            index: 2
        })
    ));
}

#[test]
fn symbol_value_past_section() {
    let mut blob = fixture();
    blob[SYMBOL_TABLE_AT + 5] = 25;

    let err = load_err(&blob);
    assert!(matches!(
        err,
        LoadError::Corrupted(Corruption::BadEntry {
            table: TableKind::Symbol,
            index: 1
        })
    ));
}

#[test]
fn past_end_sentinel_becomes_section_size() {
    let mut blob = fixture();
    blob[SYMBOL_TABLE_AT + 8] = PAST_END;

    let (storage, _) = load(&blob).unwrap();
    assert_eq!(storage.symbols[2].value, 16);
}

#[test]
fn property_outside_contents() {
    let mut blob = fixture();
    blob[PROPERTY_TABLE_AT + 8] = 5;

    let err = load_err(&blob);
    assert!(matches!(
        err,
        LoadError::Corrupted(Corruption::BadEntry {
            table: TableKind::Property,
            index: 2
        })
    ));
}

#[test]
fn nul_inside_string() {
    let mut blob = fixture();
    blob[STRINGS_AT + 1] = text(b"e\0on");

    let err = load_err(&blob);
    assert!(matches!(
        err,
        LoadError::Corrupted(Corruption::NulInString { index: 1 })
    ));
}

#[test]
fn validate_only_skips_contents() {
    let mut blob = fixture();
    blob[STRINGS_AT + 1] = text(b"e\0on");

    let mut cursor = Cursor::new(words(&blob));
    let format = DataStorage::validate_from(&mut cursor, FormatCheck::ANY).unwrap();
    assert_eq!(format, 0x1BAD_C0DE);
    assert_eq!(cursor.position(), (HEADER_SIZE + 200) as u64);

    blob[SYMBOL_TABLE_AT + 5] = 25;
    let err = DataStorage::validate_from(&mut Cursor::new(words(&blob)), FormatCheck::ANY);
    assert_eq!(err.unwrap_err().code(), 1);
}

#[test]
fn truncated_header() {
    let bytes = &words(&fixture())[..10];
    let err = DataStorage::read_from(&mut Cursor::new(bytes), FormatCheck::ANY).unwrap_err();

    assert!(matches!(err, LoadError::Read(_)));
    assert_eq!(err.code(), 3);
}

#[test]
fn truncated_body() {
    let bytes = &words(&fixture())[..HEADER_SIZE + 100];
    let err = DataStorage::read_from(&mut Cursor::new(bytes), FormatCheck::ANY).unwrap_err();

    assert_eq!(err.code(), 3);
}

#[test]
fn header_claiming_huge_table_fails_on_read() {
    // 32 MiB of string entries announced, nothing but the header present.
    let entries: u32 = 0x0040_0000;
    let table_size = entries * 8;
    #[rustfmt::skip]
    let header = [
        0,                  // format
        table_size + 1,     // full_size
        entries, 0,         // string table
        0, 0,               // property table
        0, 0,               // section table
        0, 0,               // symbol table
        1, table_size,      // strings
        0, 0,               // properties
        0, 0,               // sections
    ];
    let bytes = words(&header);
    assert_eq!(bytes.len(), HEADER_SIZE);

    let err = DataStorage::read_from(&mut Cursor::new(bytes), FormatCheck::ANY).unwrap_err();

    let LoadError::Read(io_err) = &err else {
        panic!("expected read error, got {err:?}");
    };
    assert_eq!(io_err.kind(), io::ErrorKind::UnexpectedEof);
    assert_eq!(err.code(), 3);
}

/// Reads fine, refuses every seek.
struct NoSeek<R>(R);

impl<R: Read> Read for NoSeek<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R> Seek for NoSeek<R> {
    fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "not seekable"))
    }
}

#[test]
fn seek_failure() {
    let mut reader = NoSeek(Cursor::new(words(&fixture())));
    let err = DataStorage::read_from(&mut reader, FormatCheck::ANY).unwrap_err();

    assert!(matches!(err, LoadError::Seek(_)));
    assert_eq!(err.code(), 2);
}

#[test]
fn error_display() {
    let err = LoadError::from(Corruption::BadEntry {
        table: TableKind::Symbol,
        index: 7,
    });
    assert_eq!(
        err.to_string(),
        "corrupted data storage: symbol table entry 7 is out of range"
    );

    let err = LoadError::Alloc(1024);
    assert_eq!(err.code(), 4);
    assert!(err.to_string().contains("1024"));
}
