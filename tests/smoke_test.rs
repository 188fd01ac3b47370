use fifofast::{depth, RingBuffer};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use std::thread;

type Fifo = RingBuffer<u8, 4>;

fn filled(start: u8) -> Fifo {
    let mut fifo = Fifo::new();
    for v in start..start + 4 {
        fifo.write_lite(v);
    }
    fifo
}

#[test]
fn initial_state() {
    let fifo = Fifo::new();

    assert_eq!(fifo.capacity(), 4);
    assert_eq!(fifo.mask(), 3);
    assert_eq!(fifo.level(), 0);
    assert_eq!(fifo.free(), 4);
    assert!(fifo.is_empty());
    assert!(!fifo.is_full());
}

#[test]
fn write_drops_on_overflow() {
    let mut fifo = Fifo::new();

    fifo.write_lite(0x73);
    fifo.write_lite(0x74);
    assert_eq!(fifo.level(), 2);
    assert_eq!(fifo.free(), 2);
    assert_eq!(fifo[0], 0x73);
    assert_eq!(fifo[1], 0x74);

    fifo.write(0x75).unwrap();
    fifo.write(0x76).unwrap();
    let err = fifo.write(0x77).unwrap_err();
    assert!(err.is_full());
    assert_eq!(err.into_inner(), 0x77);

    assert!(fifo.is_full());
    assert_eq!(fifo.free(), 0);
    assert_eq!(fifo.level(), 4);
    for (i, v) in (0x73..=0x76).enumerate() {
        assert_eq!(*fifo.peek(i), v);
    }

    fifo.reset();
    assert!(fifo.is_empty());
    assert_eq!(fifo.free(), 4);
}

#[test]
fn peek_overwrites_in_place() {
    let mut fifo = Fifo::new();
    fifo.write_multiple(&[10, 11, 12]);

    *fifo.peek_mut(0) = 13;
    fifo[2] = 14;

    assert_eq!(fifo.level(), 3);
    assert_eq!(fifo[0], 13);
    assert_eq!(fifo[1], 11);
    assert_eq!(fifo[2], 14);

    // offsets wrap instead of leaving the storage
    assert_eq!(fifo[4], 13);
    assert_eq!(fifo[usize::MAX], *fifo.peek(3));
}

#[test]
fn read_returns_none_when_empty() {
    let mut fifo = Fifo::new();
    fifo.write_multiple(&[20, 21, 22]);

    assert_eq!(fifo.read_lite(), 20);
    assert_eq!(fifo.read_lite(), 21);
    assert_eq!(fifo.level(), 1);
    assert_eq!(fifo[0], 22);

    assert_eq!(fifo.read(), Some(22));
    assert_eq!(fifo.read(), None);
    assert!(fifo.is_empty());
    assert_eq!(fifo.read_index(), fifo.write_index());
}

#[test]
fn add_reserves_slots() {
    let mut fifo = Fifo::new();

    *fifo.add_lite() = 30;
    *fifo.add_lite() = 31;
    assert_eq!(fifo.level(), 2);

    *fifo.add().unwrap() = 32;
    *fifo.add().unwrap() = 33;
    assert!(fifo.add().is_none());

    assert!(fifo.is_full());
    assert_eq!(fifo.iter().copied().collect::<Vec<_>>(), [30, 31, 32, 33]);
}

#[test]
fn remove_lite_from_full() {
    let mut fifo = filled(40);

    fifo.remove_lite(2);
    assert_eq!(fifo.level(), 2);
    assert_eq!(fifo[0], 42);
    assert_eq!(fifo[1], 43);

    fifo.remove_lite(1);
    assert_eq!(fifo.level(), 1);
    assert_eq!(fifo[0], 43);

    fifo.remove_lite(1);
    assert!(fifo.is_empty());
}

#[test]
fn remove_clamps_to_level() {
    let mut fifo = filled(50);

    assert_eq!(fifo.remove(0), 0);
    assert!(fifo.is_full());

    assert_eq!(fifo.remove(2), 2);
    assert_eq!(fifo.level(), 2);
    assert_eq!(fifo[0], 52);

    assert_eq!(fifo.remove(4), 2);
    assert!(fifo.is_empty());
    assert_eq!(fifo.remove(usize::MAX), 0);
}

#[test]
fn write_multiple_discards_excess() {
    let mut fifo = Fifo::new();
    fifo.write(1).unwrap();

    assert_eq!(fifo.write_multiple(&[2, 3, 4, 5, 6]), 3);
    assert!(fifo.is_full());
    assert_eq!(fifo.write_multiple(&[7]), 0);

    let mut out = [0; 8];
    assert_eq!(fifo.read_multiple(&mut out), 4);
    assert_eq!(&out[..4], &[1, 2, 3, 4]);
}

#[test]
fn rebase_moves_head_to_origin() {
    let mut fifo = filled(60);
    fifo.read().unwrap();
    fifo.read().unwrap();
    fifo.write(64).unwrap();
    fifo.write(65).unwrap();

    fifo.rebase();

    assert_eq!(fifo.read_index(), 0);
    assert_eq!(fifo.write_index(), 0);
    assert!(fifo.is_full());
    assert_eq!(fifo[0], 62);
    let (head, tail) = fifo.as_slices();
    assert_eq!(head, &[62, 63, 64, 65]);
    assert!(tail.is_empty());
    assert_eq!(fifo.peek(0) as *const u8, head.as_ptr());

    let once = fifo;
    fifo.rebase();
    assert_eq!(fifo.as_slices(), once.as_slices());
}

#[test]
fn rebase_partial_level() {
    let mut fifo = RingBuffer::<u32, 8>::new();
    fifo.write_multiple(&[0, 1, 2, 3, 4, 5]);
    fifo.remove(5);
    fifo.write_multiple(&[6, 7, 8]);

    let (head, tail) = fifo.as_slices();
    assert_eq!(head, &[5, 6, 7]);
    assert_eq!(tail, &[8]);

    assert_eq!(fifo.make_contiguous(), &[5, 6, 7, 8]);
    assert_eq!(fifo.read_index(), 0);
    assert_eq!(fifo.write_index(), 4);
    assert_eq!(fifo.level(), 4);
}

#[test]
fn rebase_without_offset_is_noop() {
    let mut fifo = RingBuffer::<u32, 8>::new();
    fifo.write_multiple(&[1, 2, 3]);
    let before = fifo;

    fifo.rebase();
    assert_eq!(fifo.as_slices(), before.as_slices());
    assert_eq!(fifo.write_index(), 3);
}

#[test]
fn full_cycle_returns_to_origin() {
    let mut fifo = RingBuffer::<u16, { depth(13) }>::new();
    fifo.write_multiple(&[9; 5]);
    fifo.remove(3);

    fifo.reset();
    for v in 0..fifo.capacity() as u16 {
        fifo.write(v).unwrap();
    }
    for v in 0..fifo.capacity() as u16 {
        assert_eq!(fifo.read(), Some(v));
    }

    assert!(fifo.is_empty());
    assert_eq!(fifo.read_index(), 0);
    assert_eq!(fifo.write_index(), 0);
}

#[test]
fn struct_elements() {
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    struct Frame {
        id: u16,
        payload: [u8; 3],
    }

    let mut fifo = RingBuffer::<Frame, 4>::new();
    let slot = fifo.add().unwrap();
    slot.id = 7;
    slot.payload = [1, 2, 3];

    assert_eq!(
        fifo.read(),
        Some(Frame {
            id: 7,
            payload: [1, 2, 3]
        })
    );
    assert_eq!(fifo.element_size(), std::mem::size_of::<Frame>());
}

fn critical_section_framework(amt: u32) {
    let fifo = Arc::new(Mutex::new(RingBuffer::<u32, 16>::new()));
    let deadline = Instant::now() + Duration::from_secs(30);

    let producer = {
        let fifo = fifo.clone();
        thread::spawn(move || {
            let mut next = 0;
            while next < amt {
                let accepted = {
                    let mut fifo = fifo.lock().unwrap();
                    fifo.write(next).is_ok()
                };
                if accepted {
                    next += 1;
                } else {
                    assert!(Instant::now() < deadline, "exec timeout");
                    thread::yield_now();
                }
            }
        })
    };

    let consumer = {
        let fifo = fifo.clone();
        thread::spawn(move || {
            let mut n = 0;
            while n < amt {
                let head = {
                    let mut fifo = fifo.lock().unwrap();
                    fifo.read()
                };
                match head {
                    Some(v) => {
                        assert_eq!(v, n);
                        n += 1;
                    }
                    None => {
                        assert!(Instant::now() < deadline, "exec timeout");
                        thread::yield_now();
                    }
                }
            }
        })
    };

    producer.join().unwrap();
    consumer.join().unwrap();
    assert!(fifo.lock().unwrap().is_empty());
}

#[test]
#[cfg_attr(miri, ignore)]
fn spsc_behind_critical_section() {
    for _ in 0..10 {
        critical_section_framework(2000);
    }
}
