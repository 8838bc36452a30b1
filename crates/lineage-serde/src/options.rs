use std::sync::OnceLock;

/// Whether foreign 64-bit integer wrappers can be coerced to native integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Int64Support {
    /// Wrappers normalize to plain integers
    Available,
    /// Wrappers pass through normalization untouched
    Unavailable,
}

impl Int64Support {
    /// Probes for numeric support once per process. A missing `numeric`
    /// feature is logged and recorded, never fatal.
    pub fn detect() -> Self {
        static DETECTED: OnceLock<Int64Support> = OnceLock::new();
        *DETECTED.get_or_init(|| {
            if cfg!(feature = "numeric") {
                Int64Support::Available
            } else {
                tracing::warn!("numeric support not compiled in; int64 wrappers will not be coerced");
                Int64Support::Unavailable
            }
        })
    }

    pub fn is_available(self) -> bool {
        self == Int64Support::Available
    }
}

/// Layout of rendered JSON text. Keys are sorted in every style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// `{"a":1,"b":[2,3]}`
    #[default]
    Compact,
    /// `{"a": 1, "b": [2, 3]}`, the separators of the legacy producer
    Spaced,
    /// Two-space indented
    Pretty,
}

#[derive(Debug, Clone)]
pub struct Options {
    pub int64: Int64Support,
    pub style: Style,
}

impl Options {
    pub fn with_int64(mut self, int64: Int64Support) -> Self {
        self.int64 = int64;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            int64: Int64Support::detect(),
            style: Style::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_is_stable() {
        assert_eq!(Int64Support::detect(), Int64Support::detect());
        assert_eq!(
            Int64Support::detect().is_available(),
            cfg!(feature = "numeric")
        );
    }

    #[test]
    fn builders_override_defaults() {
        let opts = Options::default()
            .with_int64(Int64Support::Unavailable)
            .with_style(Style::Pretty);
        assert_eq!(opts.int64, Int64Support::Unavailable);
        assert_eq!(opts.style, Style::Pretty);
    }
}
