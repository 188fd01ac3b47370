use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fifofast::{raw_storage_len, RawRing, RingBuffer, RingBufferHandle};

const SIZE: usize = 1024;

fn typed_ring(c: &mut Criterion) {
    let mut ring = RingBuffer::<u32, SIZE>::new();
    c.bench_function("typed write/read", |b| {
        b.iter(|| {
            for i in 0..SIZE as u32 {
                let _ = ring.write(black_box(i));
            }
            while let Some(v) = ring.read() {
                black_box(v);
            }
        })
    });

    c.bench_function("typed write_lite/read_lite", |b| {
        b.iter(|| {
            for i in 0..SIZE as u32 {
                ring.write_lite(black_box(i));
            }
            for _ in 0..SIZE {
                black_box(ring.read_lite());
            }
        })
    });
}

fn drain(ring: &mut RingBufferHandle, out: &mut [u8]) {
    while ring.read(out).is_ok() {
        black_box(&out);
    }
}

fn erased_ring(c: &mut Criterion) {
    let mut ring = RawRing::<[u8; raw_storage_len(4, 128)]>::new(4).unwrap();
    let mut out = [0; 4];
    c.bench_function("erased write/read", |b| {
        b.iter(|| {
            for i in 0..ring.capacity() as u32 {
                let _ = ring.write(black_box(&i.to_le_bytes()));
            }
            drain(&mut ring, &mut out);
        })
    });
}

fn rebase(c: &mut Criterion) {
    let mut ring = RingBuffer::<u64, SIZE>::new();
    c.bench_function("rebase", |b| {
        b.iter(|| {
            ring.write_multiple(&[7; SIZE / 2]);
            ring.remove(SIZE / 3);
            ring.rebase();
            ring.reset();
        })
    });
}

criterion_group!(ring_bench, typed_ring, erased_ring, rebase);
criterion_main!(ring_bench);
