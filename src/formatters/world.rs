use crate::error::UnpackError;
use crate::game::{BlockPos, BlockState, ChunkPos, Vec3d};
use crate::unpacker::{format_float, quote, Renderer};

pub fn format_block_pos(pos: &BlockPos, _: &mut Renderer<'_>) -> Result<String, UnpackError> {
    Ok(format!("{{x:{},y:{},z:{}}}", pos.x, pos.y, pos.z))
}

pub fn format_vec3d(vec: &Vec3d, _: &mut Renderer<'_>) -> Result<String, UnpackError> {
    Ok(format!(
        "{{x:{},y:{},z:{}}}",
        format_float(vec.x),
        format_float(vec.y),
        format_float(vec.z)
    ))
}

pub fn format_chunk_pos(pos: &ChunkPos, _: &mut Renderer<'_>) -> Result<String, UnpackError> {
    Ok(format!("{{x:{},z:{}}}", pos.x, pos.z))
}

/// `{block:"minecraft:oak_stairs",properties:{facing:"north"}}`; the
/// properties object is left out for blocks without state.
pub fn format_block_state(state: &BlockState, _: &mut Renderer<'_>) -> Result<String, UnpackError> {
    let mut out = format!("{{block:{}", quote(&state.block));
    if !state.properties.is_empty() {
        let props: Vec<String> = state
            .properties
            .iter()
            .map(|(name, value)| format!("{}:{}", name, quote(value)))
            .collect();
        out.push_str(&format!(",properties:{{{}}}", props.join(",")));
    }
    out.push('}');
    Ok(out)
}
