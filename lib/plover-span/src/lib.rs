pub use codespan_reporting::files::SimpleFile;

pub type Span = std::ops::Range<usize>;

/// A value tagged with the byte range it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }

    pub fn as_ref(&self) -> Spanned<&T> {
        Spanned {
            value: &self.value,
            span: self.span.clone(),
        }
    }
}

/// The smallest span covering both `a` and `b`.
pub fn join(a: &Span, b: &Span) -> Span {
    a.start.min(b.start)..a.end.max(b.end)
}

pub type SourceFile = SimpleFile<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spanned_map() {
        let spanned = Spanned::new("12", 4..6);
        let mapped = spanned.map(|text| text.len());
        assert_eq!(mapped.value, 2);
        assert_eq!(mapped.span, 4..6);
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&(3..5), &(8..10)), 3..10);
        assert_eq!(join(&(8..10), &(3..5)), 3..10);
        assert_eq!(join(&(2..9), &(4..5)), 2..9);
    }
}
