use std::cell::RefCell;

use super::*;
use crate::progress::SilentProgress;
use crate::test_support::{connected, header_replies, sent_opcodes};

#[derive(Default)]
struct Recorder(RefCell<Vec<(u64, u64)>>);

impl TransferProgress for Recorder {
    fn on_progress(&self, current: u64, total: u64) {
        self.0.borrow_mut().push((current, total));
    }
}

#[test]
fn test_opcode_bytes() {
    assert_eq!(Opcode::Handshake.byte(), 0x01);
    assert_eq!(Opcode::RomData.byte(), 0x07);
    assert_eq!(Opcode::GlobalChecksum.byte(), 0x08);
    assert_eq!(Opcode::Title.to_string(), "0x05 (game title)");
}

#[test]
fn test_response_lengths() {
    assert_eq!(Opcode::Handshake.response_len(), Some(1));
    assert_eq!(Opcode::CartridgeType.response_len(), Some(1));
    assert_eq!(Opcode::Title.response_len(), Some(16));
    assert_eq!(Opcode::Logo.response_len(), Some(48));
    assert_eq!(Opcode::GlobalChecksum.response_len(), Some(2));
    assert_eq!(Opcode::RomData.response_len(), None);
}

#[test]
fn test_decode_error_opcode() {
    assert_eq!(
        Opcode::for_decode_error(&DecodeError::UnknownRomSize(0x09)),
        Opcode::RomSize
    );
    assert_eq!(
        Opcode::for_decode_error(&DecodeError::UnknownCartridgeType(0x42)),
        Opcode::CartridgeType
    );
}

#[test]
fn test_read_raw_header_order() {
    let mut conn = connected(&header_replies(0x1B, 0x05, 0x80, b"POKEMON", 0xBEEF));
    let raw = read_raw_header(&mut conn).unwrap();
    assert_eq!(raw.cartridge_type, 0x1B);
    assert_eq!(raw.rom_size, 0x05);
    assert_eq!(raw.cgb_flag, 0x80);
    assert_eq!(&raw.title[..7], b"POKEMON");
    assert_eq!(raw.global_checksum, [0xBE, 0xEF]);
    assert_eq!(sent_opcodes(&conn), vec![0x02, 0x03, 0x04, 0x05, 0x06, 0x08]);
}

#[test]
fn test_checksum_is_big_endian() {
    let mut conn = connected(&[0x12, 0x34]);
    assert_eq!(read_global_checksum(&mut conn).unwrap(), 0x1234);
}

#[test]
fn test_short_title_times_out() {
    let mut conn = connected(b"ABCDE");
    match read_title(&mut conn).unwrap_err() {
        ReaderError::Timeout {
            opcode,
            expected,
            received,
        } => {
            assert_eq!(opcode, Opcode::Title);
            assert_eq!(expected, 16);
            assert_eq!(received, 5);
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[test]
fn test_read_rom_data_reports_every_byte() {
    let mut conn = connected(&[10, 20, 30, 40]);
    let recorder = Recorder::default();
    let data = read_rom_data(&mut conn, 4, &recorder, &AtomicBool::new(false)).unwrap();
    assert_eq!(data, vec![10, 20, 30, 40]);
    assert_eq!(
        recorder.0.into_inner(),
        vec![(1, 4), (2, 4), (3, 4), (4, 4)]
    );
    assert_eq!(sent_opcodes(&conn), vec![0x07]);
}

#[test]
fn test_read_rom_data_cancelled() {
    let mut conn = connected(&[1, 2, 3]);
    let cancel = AtomicBool::new(true);
    let err = read_rom_data(&mut conn, 3, &SilentProgress, &cancel).unwrap_err();
    assert!(matches!(
        err,
        ReaderError::Cancelled {
            bytes_read: 0,
            total: 3
        }
    ));
}

#[test]
fn test_read_rom_data_short_stream() {
    let mut conn = connected(&[1, 2]);
    let err = read_rom_data(&mut conn, 4, &SilentProgress, &AtomicBool::new(false)).unwrap_err();
    assert!(matches!(
        err,
        ReaderError::Timeout {
            opcode: Opcode::RomData,
            expected: 4,
            received: 2
        }
    ));
    assert!(err.is_transport_fault());
}

#[test]
fn test_closed_connection() {
    let mut conn = connected(&[0x00]);
    conn.close();
    assert!(matches!(
        read_cartridge_type(&mut conn),
        Err(ReaderError::NotConnected)
    ));
}
