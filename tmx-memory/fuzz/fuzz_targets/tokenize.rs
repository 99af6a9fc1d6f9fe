#![no_main]

use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use tmx_memory::placeholders::{realign, tokenize};

fuzz_target!(|inputs: (&str, &str, &str)| {
    let (key, source, target) = inputs;

    // Tokenizing must be lossless.
    let tokens = tokenize(key);
    let rendered = tokens.iter().map(|token| token.render()).collect::<String>();
    assert_eq!(rendered, key);

    let _ = realign(target, source, &tokens);
});
