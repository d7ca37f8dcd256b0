#![no_main]

use libfuzzer_sys::fuzz_target;
use tc_split::{check_round_trip, split, FileKind, Fidelity};

const MAX_SOURCE_BYTES: usize = 8192;

fn decode_source(bytes: &[u8]) -> String {
    let capped = &bytes[..bytes.len().min(MAX_SOURCE_BYTES)];
    String::from_utf8_lossy(capped).into_owned()
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let kind = FileKind::ALL[usize::from(selector) % FileKind::ALL.len()];
    let source = decode_source(rest);

    let parsed = split(&source, kind);
    assert_eq!(parsed.file_kind(), kind);

    let round_trip = check_round_trip(&source, kind);
    if kind == FileKind::Unknown {
        assert_eq!(round_trip.fidelity, Fidelity::Exact);
        return;
    }
    if round_trip.fidelity.is_degraded() {
        return;
    }
    // A clean rebuild is a fixpoint.
    let again = check_round_trip(&round_trip.rebuilt, kind);
    assert_eq!(again.rebuilt, round_trip.rebuilt);
});
