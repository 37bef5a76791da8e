#![no_main]

use libfuzzer_sys::fuzz_target;
use wta_stats::arrival::aggregate_all;
use wta_stats::trace_loader::parse_arrivals;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing may fail, but must not panic; parsed records must aggregate
        if let Ok(records) = parse_arrivals(input) {
            for map in aggregate_all(&records) {
                assert_eq!(map.total(), records.len() as u64);
            }
        }
    }
});
