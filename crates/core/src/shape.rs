//! Element shapes
//!
//! A [`Shape`] is the fixed extent of every element a buffer holds. The empty
//! shape `()` denotes a scalar element.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Fixed extent of a buffer element
///
/// Dimensions are stored inline for up to four axes, which covers every
/// practical element shape without a heap allocation.
///
/// # Examples
///
/// ```
/// use slabbuf_core::Shape;
///
/// let scalar = Shape::scalar();
/// let matrix = Shape::new([2, 2]);
///
/// assert!(scalar.is_scalar());
/// assert_eq!(matrix.num_elements(), 4);
/// assert_eq!(matrix.to_string(), "(2, 2)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(SmallVec<[usize; 4]>);

impl Shape {
    /// Create a shape from its dimension extents
    pub fn new(dims: impl IntoIterator<Item = usize>) -> Self {
        Shape(dims.into_iter().collect())
    }

    /// The scalar shape `()`
    pub fn scalar() -> Self {
        Shape(SmallVec::new())
    }

    /// Dimension extents, outermost first
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Number of dimensions (0 for a scalar)
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Check if this is the scalar shape
    pub fn is_scalar(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of values an element of this shape holds
    ///
    /// A scalar holds exactly one value; any zero extent yields zero.
    pub fn num_elements(&self) -> usize {
        self.0.iter().product()
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::new(dims.iter().copied())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Shape::new(dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "()"),
            [only] => write!(f, "({},)", only),
            dims => {
                write!(f, "(")?;
                for (i, d) in dims.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", d)?;
                }
                write!(f, ")")
            }
        }
    }
}
