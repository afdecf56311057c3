use crate::error::UnpackError;
use crate::game::CustomPayload;
use crate::unpacker::{quote, Renderer};

/// `{channel:"minecraft:brand",payloadType:"Brand",data:"vanilla"}`. The
/// data goes back through the renderer so decoded payloads unpack deeply.
pub fn format_custom_payload(
    payload: &CustomPayload,
    renderer: &mut Renderer<'_>,
) -> Result<String, UnpackError> {
    let data = renderer.render(&payload.data());
    Ok(format!(
        "{{channel:{},payloadType:{},data:{}}}",
        quote(payload.channel()),
        quote(&payload.payload_type()),
        data
    ))
}
