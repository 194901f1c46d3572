//! Id and Token declarations: a validated hex-string newtype plus a codec
//! that writes its fixed number of raw bytes.

use typecodec_types::HexName;

use crate::definition::{Definition, DefinitionKind};
use crate::naming::codec_name;
use crate::writer::SourceWriter;

/// The newtype and codec for one Id or Token name.
pub fn generate_hex_group(hex: &HexName) -> Vec<Definition> {
    tracing::debug!(name = %hex.name, kind = hex.kind.label(), "generating hex type");
    let name = &hex.name;
    let size = hex.byte_size();
    let digits = size * 2;

    let mut w = SourceWriter::new();
    w.line("#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]");
    w.line(&format!("pub struct {name}(String);"));
    w.blank();
    w.open(&format!("impl {name} {{"));
    w.line("/// Byte length on the wire.");
    w.line(&format!("pub const BYTE_SIZE: usize = {size};"));
    w.blank();
    w.line(&format!(
        "/// Accepts exactly {digits} hex digits. Uppercase digits are lowercased."
    ));
    w.open("pub fn from_hex(text: &str) -> Option<Self> {");
    w.open("if is_hex_string(Self::BYTE_SIZE, text) {");
    w.line("Some(Self(text.to_ascii_lowercase()))");
    w.reopen("} else {");
    w.line("None");
    w.close("}");
    w.close("}");
    w.blank();
    w.open("pub fn as_str(&self) -> &str {");
    w.line("&self.0");
    w.close("}");
    w.close("}");
    let type_decl = Definition::new(
        name.as_str(),
        format!(
            "{size}-byte {} carried as {digits} lowercase hex characters.",
            hex.kind.label()
        ),
        DefinitionKind::Type,
        w.finish(),
    );

    let codec = codec_name(name);
    let mut c = SourceWriter::new();
    c.line("#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]");
    c.line(&format!("pub struct {codec};"));
    c.blank();
    c.open(&format!("impl Codec for {codec} {{"));
    c.line(&format!("type Value = {name};"));
    c.blank();
    c.open(&format!("fn encode(&self, value: &{name}, out: &mut Vec<u8>) {{"));
    c.line(&format!("encode_hex_string({name}::BYTE_SIZE, &value.0, out);"));
    c.close("}");
    c.blank();
    c.open(&format!(
        "fn decode(&self, offset: usize, bytes: &[u8]) -> Result<Decoded<{name}>, DecodeError> {{"
    ));
    c.line(&format!(
        "Ok(decode_hex_string({name}::BYTE_SIZE, offset, bytes)?.map({name}))"
    ));
    c.close("}");
    c.close("}");
    let codec_decl = Definition::new(
        codec.as_str(),
        format!("Binary codec for [`{name}`]."),
        DefinitionKind::Codec,
        c.finish(),
    );

    vec![type_decl, codec_decl]
}
