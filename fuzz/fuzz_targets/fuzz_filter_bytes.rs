#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must fail cleanly or round-trip exactly
    if let Ok(filter) = nsuggest::utils::BloomFilter::from_bytes(data) {
        assert_eq!(filter.to_bytes(), data);
    }
});
