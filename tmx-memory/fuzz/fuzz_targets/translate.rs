#![no_main]

use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use tmx_memory::{MemoryConfig, Phrase, TmxIndexBuilder, TranslationMemory};
use tmx_memory_fuzz::{create_document, Unit};

fuzz_target!(|inputs: (Vec<Unit>, String, String)| {
    let (units, key, meta_key) = inputs;
    let document = create_document("de", &units);

    let Ok(corpus) = TmxIndexBuilder::new().build(&document) else {
        return;
    };
    let Ok(again) = TmxIndexBuilder::new().build(&document) else {
        return;
    };
    let memory = TranslationMemory::new(corpus, MemoryConfig::default());
    let second = TranslationMemory::new(again, MemoryConfig::default());

    let phrase = Phrase::new(key, meta_key);
    let _ = memory.translation_for("de", &phrase);
    assert_eq!(memory.checksum_for("de"), second.checksum_for("de"));
});
