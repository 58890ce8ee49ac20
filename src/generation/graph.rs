//! Job-graph template handling
//!
//! The template is a backend node graph keyed by node id. Only four slots
//! are rewritten per request: the positive and negative CLIP text and the
//! two sampler seeds.

use rand::Rng;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Node the backend streams finished images from
pub const OUTPUT_NODE: &str = "save_image_websocket_node";

const POSITIVE_TEXT_SLOT: &str = "/73/inputs/text";
const NEGATIVE_TEXT_SLOT: &str = "/74/inputs/text";
const SEED_SLOTS: [&str; 2] = ["/99/inputs/seed", "/106/inputs/seed"];

/// Seeds are uniform ten-digit integers
pub const SEED_MIN: u64 = 1_000_000_000;
pub const SEED_MAX: u64 = 9_999_999_999;

/// Load the job-graph template from disk
pub fn load_template(path: &Path) -> Result<Value> {
    let data = fs::read_to_string(path).map_err(|_| {
        Error::NotFound(format!("Prompt template not found at {}", path.display()))
    })?;
    Ok(serde_json::from_str(&data)?)
}

/// Inject prompt text and fresh seeds into a template copy
pub fn prepare(mut graph: Value, positive: &str, negative: &str) -> Result<Value> {
    set_slot(&mut graph, POSITIVE_TEXT_SLOT, Value::from(positive))?;
    set_slot(&mut graph, NEGATIVE_TEXT_SLOT, Value::from(negative))?;

    let mut rng = rand::thread_rng();
    for slot in SEED_SLOTS {
        set_slot(&mut graph, slot, Value::from(rng.gen_range(SEED_MIN..=SEED_MAX)))?;
    }
    Ok(graph)
}

fn set_slot(graph: &mut Value, pointer: &str, value: Value) -> Result<()> {
    match graph.pointer_mut(pointer) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(Error::Config(format!(
            "Prompt template is missing slot {pointer}"
        ))),
    }
}
