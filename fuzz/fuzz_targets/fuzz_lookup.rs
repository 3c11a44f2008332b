#![no_main]

use libfuzzer_sys::fuzz_target;
use nsuggest::index::{DictionaryEncoder, MIN_PREFIX_LENGTH};
use nsuggest::query::{BloomNameLookup, NameLookup, SortedNameLookup};
use nsuggest::utils::BloomFilter;

fuzz_target!(|input: (Vec<String>, String, u8)| {
    let (names, prefix, max) = input;
    let max = (max % 6) as usize;

    let mut filter = BloomFilter::new(100_000, 1e-6).unwrap();
    let encoder = DictionaryEncoder::default();
    for name in &names {
        encoder.ingest(name, &mut filter);
    }
    let bloom = BloomNameLookup::new(filter);
    let exact = SortedNameLookup::new(names.iter().cloned(), MIN_PREFIX_LENGTH).unwrap();

    // Invalid prefixes are rejected, valid ones never exceed the budget bound
    if let Ok(suggestions) = bloom.lookup(&prefix, max) {
        assert!(suggestions.len() <= max.max(27));
        let _ = exact.lookup(&prefix, max);
    }
});
