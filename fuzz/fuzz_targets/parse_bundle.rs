#![no_main]

use libfuzzer_sys::fuzz_target;
use po_message_bundle::{IdGenerator, MessageBundle};

struct KeyIds;

impl IdGenerator for KeyIds {
    fn generate(&self, _meaning: Option<&str>, key: &str) -> String {
        key.to_string()
    }
}

fuzz_target!(|po: &str| {
    let _ = MessageBundle::parse(po, "fuzz", Box::new(KeyIds)); // Err(_) can happen and it's fine.
});
