use std::ops::Range;

/// A byte range into the source being parsed.
pub type Span = Range<usize>;
pub type Spanned<T> = (T, Span);

/// Returns the smallest span covering both `lt` and `rt`.
pub fn span_join(lt: &Span, rt: &Span) -> Span {
    lt.start.min(rt.start)..lt.end.max(rt.end)
}
