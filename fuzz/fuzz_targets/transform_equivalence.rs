#![no_main]

use avl_bst::model::{run_transform_equivalence, TransformInput};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: TransformInput| {
    run_transform_equivalence(input);
});
