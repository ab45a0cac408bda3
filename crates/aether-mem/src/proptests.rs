use std::collections::HashMap;

use proptest::prelude::*;

use crate::SparseMemory;

#[derive(Debug, Clone)]
enum Op {
    Write { addr: u64, data: Vec<u8> },
    Read { addr: u64, len: usize },
    ReadInto { addr: u64, len: usize },
    Peek { addr: u64, len: usize },
}

const MODEL_SPAN: u64 = 4 * 1024;
const MAX_OPS: usize = 64;
const MAX_RW_LEN: usize = 256;

fn page_size_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(1usize),
        Just(3usize),
        Just(4usize),
        Just(16usize),
        Just(64usize),
        Just(1024usize),
    ]
}

fn addr_strategy() -> impl Strategy<Value = u64> {
    // Clustered in a small window so ops overlap often enough to be
    // interesting.
    0u64..MODEL_SPAN
}

fn op_strategy() -> BoxedStrategy<Op> {
    let write = (addr_strategy(), prop::collection::vec(any::<u8>(), 0..=MAX_RW_LEN))
        .prop_map(|(addr, data)| Op::Write { addr, data });
    let read = (addr_strategy(), 0usize..=MAX_RW_LEN)
        .prop_map(|(addr, len)| Op::Read { addr, len });
    let read_into = (addr_strategy(), 0usize..=MAX_RW_LEN)
        .prop_map(|(addr, len)| Op::ReadInto { addr, len });
    let peek = (addr_strategy(), 0usize..=MAX_RW_LEN)
        .prop_map(|(addr, len)| Op::Peek { addr, len });

    prop_oneof![
        4 => write,
        3 => read,
        2 => read_into,
        2 => peek,
    ]
    .boxed()
}

/// Expected bytes for `[addr, addr + len)` under the sparse model: written
/// bytes where present, zero everywhere else.
fn model_range(model: &HashMap<u64, u8>, addr: u64, len: usize) -> Vec<u8> {
    (0..len as u64)
        .map(|i| model.get(&(addr + i)).copied().unwrap_or(0))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_matches_reference_model(
        page_size in page_size_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..=MAX_OPS),
    ) {
        let mut mem = SparseMemory::with_page_size(page_size).unwrap();
        let mut model: HashMap<u64, u8> = HashMap::new();

        for op in ops {
            match op {
                Op::Write { addr, data } => {
                    mem.write(addr, &data).unwrap();
                    for (i, byte) in data.iter().enumerate() {
                        model.insert(addr + i as u64, *byte);
                    }

                    // Read-after-write must match what we wrote.
                    let read_back = mem.read(addr, data.len()).unwrap();
                    prop_assert_eq!(read_back.as_slice(), data.as_slice());
                }
                Op::Read { addr, len } => {
                    let got = mem.read(addr, len).unwrap();
                    prop_assert_eq!(got, model_range(&model, addr, len));
                }
                Op::ReadInto { addr, len } => {
                    let mut buf = vec![0xA5u8; len];
                    mem.read_into(addr, &mut buf).unwrap();
                    prop_assert_eq!(buf, model_range(&model, addr, len));
                }
                Op::Peek { addr, len } => {
                    let resident = mem.allocated_pages();
                    let mut buf = vec![0xA5u8; len];
                    mem.peek_into(addr, &mut buf).unwrap();
                    prop_assert_eq!(buf, model_range(&model, addr, len));
                    prop_assert_eq!(mem.allocated_pages(), resident);
                }
            }
        }
    }

    #[test]
    fn prop_round_trip_anywhere(
        page_size in page_size_strategy(),
        addr in 0u64..=u64::MAX - MAX_RW_LEN as u64,
        data in prop::collection::vec(any::<u8>(), 0..=MAX_RW_LEN),
    ) {
        let mut mem = SparseMemory::with_page_size(page_size).unwrap();
        mem.write(addr, &data).unwrap();
        prop_assert_eq!(mem.read(addr, data.len()).unwrap(), data);
    }

    #[test]
    fn prop_reads_materialize_exactly_the_covered_pages(
        page_size in page_size_strategy(),
        addr in 0u64..MODEL_SPAN,
        len in 1usize..=MAX_RW_LEN,
    ) {
        let mut mem = SparseMemory::with_page_size(page_size).unwrap();
        mem.read(addr, len).unwrap();

        let first = addr / page_size as u64;
        let last = (addr + len as u64 - 1) / page_size as u64;
        prop_assert_eq!(mem.allocated_pages() as u64, last - first + 1);

        // A second identical read changes nothing.
        mem.read(addr, len).unwrap();
        prop_assert_eq!(mem.allocated_pages() as u64, last - first + 1);
    }

    #[test]
    fn prop_peek_agrees_with_read(
        page_size in page_size_strategy(),
        addr in 0u64..MODEL_SPAN,
        data in prop::collection::vec(any::<u8>(), 1..=MAX_RW_LEN),
        lead in 0u64..8,
        trail in 0usize..8,
    ) {
        let mut mem = SparseMemory::with_page_size(page_size).unwrap();
        mem.write(addr + lead, &data).unwrap();

        // Peek over a slightly wider window, then the materializing read.
        let len = lead as usize + data.len() + trail;
        let mut peeked = vec![0xA5u8; len];
        mem.peek_into(addr, &mut peeked).unwrap();
        let read = mem.read(addr, len).unwrap();
        prop_assert_eq!(peeked, read);
    }
}
