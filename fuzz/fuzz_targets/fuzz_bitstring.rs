#![no_main]

use libfuzzer_sys::fuzz_target;

use bitchain_core::Bitstring;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Parsing arbitrary text must never panic, and accepted input must
    // survive a print/parse cycle.
    if let Ok(bits) = text.parse::<Bitstring>() {
        assert!(!bits.is_empty());
        assert!(bits.iter().all(|b| b <= 1));
        let again: Bitstring = bits.to_string().parse().unwrap();
        assert_eq!(bits, again);
    }

    // Raw bytes are accepted only when every value is a bit.
    let raw = Bitstring::new(data.to_vec());
    assert_eq!(raw.is_ok(), !data.is_empty() && data.iter().all(|&b| b <= 1));
});
