//! Right-to-left function composition.

/// Composes unary transforms from right to left.
///
/// `compose(vec![f, g])` produces `|x| f(g(x))`: the last transform is
/// applied to the seed first and earlier transforms wrap it. Composing
/// nothing yields the identity; composing one transform yields that
/// transform unchanged. Pure: no validation and no side effects.
pub fn compose<T: 'static>(
    transforms: Vec<Box<dyn FnOnce(T) -> T>>,
) -> Box<dyn FnOnce(T) -> T> {
    Box::new(move |seed| {
        transforms
            .into_iter()
            .rev()
            .fold(seed, |inner, transform| transform(inner))
    })
}
