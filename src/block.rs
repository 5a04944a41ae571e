use std::sync::mpsc;

use threadpool::ThreadPool;

use crate::container::Container;
use crate::error::Error;
use crate::huffman::{
    build_frequency_table, decode, encode, generate_codes, EncodedBitstream, FrequencyTable,
    HuffmanTree, TieBreak,
};
use crate::symbol::{checksum_of, WireSymbol};
use crate::Result;

pub const DEFAULT_BLOCK_SIZE: usize = 1 << 20;

/// One independently coded segment: its own frequency table (and thereby its
/// own tree), the packed code bits and a checksum of the original symbols.
#[derive(Clone, Debug, PartialEq)]
pub struct CompressedBlock<S> {
    table: FrequencyTable<S>,
    bitstream: EncodedBitstream,
    checksum: u32,
}

impl<S: WireSymbol> CompressedBlock<S> {
    pub fn encode(symbols: &[S], tie_break: TieBreak) -> Result<Self> {
        let table = build_frequency_table(symbols);
        let tree = HuffmanTree::with_tie_break(&table, tie_break);
        let codes = generate_codes(&tree);
        let bitstream = encode(symbols, &codes)?;
        log::debug!(
            "Encoded {} symbols ({} distinct) into {} bits",
            symbols.len(),
            table.len(),
            bitstream.bit_count()
        );
        Ok(Self {
            table,
            bitstream,
            checksum: checksum_of(symbols),
        })
    }

    /// Checks that the announced symbol count agrees with the table.
    pub(crate) fn from_parts(
        index: usize,
        table: FrequencyTable<S>,
        bitstream: EncodedBitstream,
        checksum: u32,
    ) -> Result<Self> {
        if table.total() != bitstream.symbol_count {
            return Err(Error::SymbolCountMismatch {
                block: index,
                header: bitstream.symbol_count as u64,
                table: table.total(),
            });
        }
        Ok(Self {
            table,
            bitstream,
            checksum,
        })
    }

    /// `index` only labels errors.
    pub fn decode(&self, index: usize, tie_break: TieBreak) -> Result<Vec<S>> {
        let tree = HuffmanTree::with_tie_break(&self.table, tie_break);
        let symbols = decode(&self.bitstream, &tree)?;
        let actual = checksum_of(&symbols);
        if actual != self.checksum {
            log::warn!("Block {} failed checksum verification", index);
            return Err(Error::ChecksumMismatch {
                block: index,
                expected: self.checksum,
                actual,
            });
        }
        Ok(symbols)
    }
}

impl<S> CompressedBlock<S> {
    pub fn table(&self) -> &FrequencyTable<S> {
        &self.table
    }

    pub fn bitstream(&self) -> &EncodedBitstream {
        &self.bitstream
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn symbol_count(&self) -> usize {
        self.bitstream.symbol_count
    }
}

/// Codes blocks concurrently on a thread pool, results keep input order.
pub struct BlockCoder<'a> {
    threadpool: &'a ThreadPool,
    block_size: usize,
    tie_break: TieBreak,
}

impl<'a> BlockCoder<'a> {
    pub fn new(threadpool: &'a ThreadPool, block_size: usize, tie_break: TieBreak) -> Self {
        Self {
            threadpool,
            block_size: block_size.max(1),
            tie_break,
        }
    }

    pub fn encode<S: WireSymbol>(&self, symbols: &[S]) -> Result<Container<S>> {
        let tie_break = self.tie_break;
        let jobs = symbols.chunks(self.block_size).map(|chunk| {
            let chunk = chunk.to_vec();
            move || CompressedBlock::encode(&chunk, tie_break)
        });
        let blocks = self.run_in_order(jobs)?;
        Ok(Container::new(tie_break, blocks))
    }

    pub fn decode<S: WireSymbol>(&self, container: Container<S>) -> Result<Vec<S>> {
        let tie_break = container.tie_break();
        let jobs = container
            .into_blocks()
            .into_iter()
            .enumerate()
            .map(|(index, block)| move || block.decode(index, tie_break));
        let decoded = self.run_in_order(jobs)?;
        Ok(decoded.into_iter().flatten().collect())
    }

    fn run_in_order<T, F>(&self, jobs: impl Iterator<Item = F>) -> Result<Vec<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let mut job_count = 0;
        for (index, job) in jobs.enumerate() {
            let sender = sender.clone();
            self.threadpool.execute(move || {
                log::debug!("Processing block {}", index);
                let _ = sender.send((index, job()));
            });
            job_count += 1;
        }
        drop(sender);

        // wait for every block so the lowest failing index is reported
        let mut results: Vec<Option<Result<T>>> = (0..job_count).map(|_| None).collect();
        for (index, result) in receiver.iter() {
            results[index] = Some(result);
        }
        results
            .into_iter()
            .enumerate()
            .map(|(index, result)| result.unwrap_or_else(|| Err(Error::BlockWorkerFailed(index))))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use threadpool::ThreadPool;

    use super::{BlockCoder, CompressedBlock};
    use crate::container::Container;
    use crate::error::Error;
    use crate::huffman::test_sequences::skewed_sequence;
    use crate::huffman::TieBreak;

    fn sample_sequence(length: usize) -> Vec<i16> {
        skewed_sequence(99, length, 40)
            .into_iter()
            .map(|symbol| symbol as i16 - 20)
            .collect()
    }

    #[test]
    fn test_block_round_trip() {
        let symbols = sample_sequence(1000);
        let block = CompressedBlock::encode(&symbols, TieBreak::OldestFirst).unwrap();
        assert_eq!(block.symbol_count(), 1000);
        assert_eq!(block.decode(0, TieBreak::OldestFirst).unwrap(), symbols);
    }

    #[test]
    fn test_block_checksum_mismatch() {
        let symbols: Vec<u8> = b"abracadabra".to_vec();
        let block = CompressedBlock::encode(&symbols, TieBreak::OldestFirst).unwrap();
        let tampered = CompressedBlock::from_parts(
            3,
            block.table().clone(),
            block.bitstream().clone(),
            block.checksum() ^ 1,
        )
        .unwrap();
        let result = tampered.decode(3, TieBreak::OldestFirst);
        assert!(matches!(
            result,
            Err(Error::ChecksumMismatch { block: 3, .. })
        ));
    }

    #[test]
    fn test_from_parts_rejects_count_mismatch() {
        let block = CompressedBlock::encode(&[1u8, 2, 2], TieBreak::OldestFirst).unwrap();
        let mut bitstream = block.bitstream().clone();
        bitstream.symbol_count = 4;
        let result = CompressedBlock::from_parts(0, block.table().clone(), bitstream, 0);
        assert!(matches!(
            result,
            Err(Error::SymbolCountMismatch {
                header: 4,
                table: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_parallel_round_trip_keeps_order() {
        let symbols = sample_sequence(10_000);
        for threads in [1, 2, 4] {
            let threadpool = ThreadPool::new(threads);
            let coder = BlockCoder::new(&threadpool, 777, TieBreak::OldestFirst);
            let container = coder.encode(&symbols).unwrap();
            assert_eq!(container.blocks().len(), 13);
            assert_eq!(container.symbol_count(), symbols.len());
            assert_eq!(coder.decode(container).unwrap(), symbols);
        }
    }

    #[test]
    fn test_block_size_does_not_change_result() {
        let symbols: Vec<u8> = b"to be or not to be, that is the question".to_vec();
        let threadpool = ThreadPool::new(2);
        for block_size in [1, 5, 40, 1000] {
            let coder = BlockCoder::new(&threadpool, block_size, TieBreak::NewestFirst);
            let container = coder.encode(&symbols).unwrap();
            assert_eq!(coder.decode(container).unwrap(), symbols);
        }
    }

    #[test]
    fn test_empty_input_gives_no_blocks() {
        let threadpool = ThreadPool::new(2);
        let coder = BlockCoder::new(&threadpool, 16, TieBreak::OldestFirst);
        let container = coder.encode::<u8>(&[]).unwrap();
        assert!(container.blocks().is_empty());
        assert!(coder.decode(container).unwrap().is_empty());
    }

    #[test]
    fn test_lowest_failing_block_is_reported() {
        let threadpool = ThreadPool::new(4);
        let coder = BlockCoder::new(&threadpool, 4, TieBreak::OldestFirst);
        let symbols: Vec<u8> = b"aaaabbbbccccddddeeeeffff".to_vec();
        for _ in 0..20 {
            let container = coder.encode(&symbols).unwrap();
            let tie_break = container.tie_break();
            let mut blocks = container.into_blocks();
            for index in [1, 3, 5] {
                blocks[index] = CompressedBlock::from_parts(
                    index,
                    blocks[index].table().clone(),
                    blocks[index].bitstream().clone(),
                    blocks[index].checksum().wrapping_add(1),
                )
                .unwrap();
            }
            let result = coder.decode(Container::new(tie_break, blocks));
            assert!(matches!(
                result,
                Err(Error::ChecksumMismatch { block: 1, .. })
            ));
        }
    }
}
