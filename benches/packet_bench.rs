use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use packet_stream::Packet;

#[allow(clippy::unwrap_used)]
fn bench_packet_append_shift(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_append_shift");
    let payload_sizes = [64usize, 512, 4096, 65536, 1024 * 1024];

    for &size in &payload_sizes {
        let payload = vec![0x5Au8; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_function(format!("append_string_{size}b"), |b| {
            b.iter_batched(
                Packet::new,
                |mut packet| {
                    packet.append_string(&payload);
                    packet
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("shift_string_{size}b"), |b| {
            b.iter_batched(
                || Packet::from_bytes(&payload),
                |mut packet| packet.shift_string(size).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_integer_fields(c: &mut Criterion) {
    let mut group = c.benchmark_group("integer_fields");
    const FIELDS: u64 = 10_000;
    group.throughput(Throughput::Bytes(FIELDS * 8));

    group.bench_function("append_shift_u64", |b| {
        b.iter_batched(
            Packet::new,
            |mut packet| {
                for v in 0..FIELDS {
                    packet.append_u64(v);
                }
                for _ in 0..FIELDS {
                    packet.shift_u64().unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("append_pop_u32", |b| {
        let mut packet = Packet::new();
        b.iter(|| {
            packet.append_u32(0xDEAD_BEEF);
            packet.pop_u32().unwrap()
        })
    });

    // Single-byte append throughput, the hot path every wider field goes through
    group.bench_function("append_u8_repeated", |b| {
        b.iter_batched(
            Packet::new,
            |mut packet| {
                for _ in 0..FIELDS * 8 {
                    packet.append_u8(0x12);
                }
                packet
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_packet_append_shift, bench_integer_fields);
criterion_main!(benches);
