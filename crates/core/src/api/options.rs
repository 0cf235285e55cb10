//! Injection options.

/// How the payload is written into the content stream's string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadEncoding {
    /// Bytes are copied untouched so the payload appears verbatim in the
    /// file. Payloads that would end the literal early are rejected.
    #[default]
    Verbatim,
    /// `\`, `(` and `)` are backslash-escaped and line breaks written as
    /// `\r`/`\n`. Accepts any payload.
    Escaped,
}

/// Options for the invisible-text generator.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectOptions {
    /// Preferred resource name for the injected font, without `/`.
    /// A numeric suffix is added if the host already uses the name.
    pub font_name: String,

    /// Standard base font referenced by the injected font dictionary.
    pub base_font: String,

    /// Size operand for `Tf`.
    pub font_size: f32,

    /// Text position for `Td`.
    pub origin: (f32, f32),

    pub payload_encoding: PayloadEncoding,
}

impl Default for InjectOptions {
    fn default() -> Self {
        Self {
            font_name: "Font124573".to_string(),
            base_font: "Times-Roman".to_string(),
            font_size: 24.0,
            origin: (0.0, 0.0),
            payload_encoding: PayloadEncoding::Verbatim,
        }
    }
}

impl InjectOptions {
    pub fn font_name(mut self, name: &str) -> Self {
        self.font_name = name.trim_start_matches('/').to_string();
        self
    }

    pub fn base_font(mut self, base_font: &str) -> Self {
        self.base_font = base_font.trim_start_matches('/').to_string();
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn origin(mut self, x: f32, y: f32) -> Self {
        self.origin = (x, y);
        self
    }

    pub fn payload_encoding(mut self, encoding: PayloadEncoding) -> Self {
        self.payload_encoding = encoding;
        self
    }
}
