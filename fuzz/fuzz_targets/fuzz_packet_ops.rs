#![no_main]

use libfuzzer_sys::fuzz_target;
use packet_stream::Packet;

fuzz_target!(|data: &[u8]| {
    // First byte picks the chunk capacity, the rest is an operation stream
    let Some((&capacity, ops)) = data.split_first() else {
        return;
    };
    let Ok(mut packet) = Packet::with_capacity(capacity as usize % 32 + 1) else {
        return;
    };

    let mut expected = 0usize;
    for pair in ops.chunks(2) {
        let value = pair.get(1).copied().unwrap_or_default();
        match pair[0] % 6 {
            0 => {
                packet.append_u8(value);
                expected += 1;
            }
            1 => {
                packet.append_u32(u32::from(value) * 0x0101_0101);
                expected += 4;
            }
            2 => {
                if packet.pop_u8().is_ok() {
                    expected -= 1;
                }
            }
            3 => {
                if packet.shift_u16().is_ok() {
                    expected -= 2;
                }
            }
            4 => {
                if packet.pop_u64().is_ok() {
                    expected -= 8;
                }
            }
            _ => {
                if packet.shift_string(value as usize).is_ok() {
                    expected -= value as usize;
                }
            }
        }
        assert_eq!(packet.data_size(), expected);
    }
    assert_eq!(packet.buffer().live_bytes_scan(), expected);
});
