#![no_main]

use avl_bst::model::CursorEquivalenceInput;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: CursorEquivalenceInput| {
    avl_bst::model::run_cursor_equivalence(input.values, input.ops);
});
