//! Buffer elements and the conversion step that admits them
//!
//! Every buffer declares an [`ElementSpec`] at construction. Items handed to
//! `write` pass through [`IntoElement`] exactly once: the item is turned into
//! an [`Element`], its shape is compared against the declared shape, and its
//! values are converted to the declared type. Nothing downstream of this
//! module re-validates elements.
//!
//! # Accepted inputs
//!
//! | Input | Shape |
//! |-------|-------|
//! | `bool`, `i32`, `i64`, `f64`, `&str`, `String`, [`Scalar`] | `()` |
//! | `Vec<T>`, `[T; N]`, `&[T]` | `(n,)` |
//! | `Vec<Vec<T>>` (rectangular) | `(rows, cols)` |
//! | `serde_json::Value` (nested arrays) | inferred from nesting |
//! | [`Element`] | its own |

use crate::dtype::{DType, Layout, Scalar};
use crate::error::{BufferError, BufferResult};
use crate::shape::Shape;
use serde_json::Value;

/// Flat, row-major element values of one type
#[derive(Debug, Clone, PartialEq)]
pub enum ElementData {
    /// Boolean values
    Bool(Vec<bool>),
    /// Integer values
    Int(Vec<i64>),
    /// Float values
    Float(Vec<f64>),
    /// String values
    Str(Vec<String>),
}

impl ElementData {
    /// Type of the stored values
    pub fn dtype(&self) -> DType {
        match self {
            ElementData::Bool(_) => DType::Bool,
            ElementData::Int(_) => DType::Int64,
            ElementData::Float(_) => DType::Float64,
            ElementData::Str(_) => DType::Str,
        }
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        match self {
            ElementData::Bool(v) => v.len(),
            ElementData::Int(v) => v.len(),
            ElementData::Float(v) => v.len(),
            ElementData::Str(v) => v.len(),
        }
    }

    /// Check if no values are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at a flat row-major index
    pub fn get(&self, index: usize) -> Option<Scalar> {
        match self {
            ElementData::Bool(v) => v.get(index).copied().map(Scalar::Bool),
            ElementData::Int(v) => v.get(index).copied().map(Scalar::Int),
            ElementData::Float(v) => v.get(index).copied().map(Scalar::Float),
            ElementData::Str(v) => v.get(index).cloned().map(Scalar::Str),
        }
    }

    /// Convert to `to` if the conversion is a widening one
    ///
    /// Hands the data back unchanged on refusal.
    fn cast(self, to: DType) -> Result<ElementData, ElementData> {
        match (self, to) {
            (data, to) if data.dtype() == to => Ok(data),
            (ElementData::Bool(v), DType::Int64) => {
                Ok(ElementData::Int(v.into_iter().map(i64::from).collect()))
            }
            (ElementData::Bool(v), DType::Float64) => Ok(ElementData::Float(
                v.into_iter().map(|b| if b { 1.0 } else { 0.0 }).collect(),
            )),
            (ElementData::Int(v), DType::Float64) => {
                Ok(ElementData::Float(v.into_iter().map(|i| i as f64).collect()))
            }
            (data, _) => Err(data),
        }
    }
}

/// Primitive value types an element can be assembled from
pub trait ElementValue: Sized {
    /// Pack a flat list of values
    fn pack(values: Vec<Self>) -> ElementData;
}

impl ElementValue for bool {
    fn pack(values: Vec<Self>) -> ElementData {
        ElementData::Bool(values)
    }
}

impl ElementValue for i64 {
    fn pack(values: Vec<Self>) -> ElementData {
        ElementData::Int(values)
    }
}

impl ElementValue for i32 {
    fn pack(values: Vec<Self>) -> ElementData {
        ElementData::Int(values.into_iter().map(i64::from).collect())
    }
}

impl ElementValue for f64 {
    fn pack(values: Vec<Self>) -> ElementData {
        ElementData::Float(values)
    }
}

impl ElementValue for String {
    fn pack(values: Vec<Self>) -> ElementData {
        ElementData::Str(values)
    }
}

impl ElementValue for &str {
    fn pack(values: Vec<Self>) -> ElementData {
        ElementData::Str(values.into_iter().map(str::to_string).collect())
    }
}

/// One fixed-shape, fixed-type buffer value
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    shape: Shape,
    data: ElementData,
}

impl Element {
    /// Scalar element
    pub fn scalar(value: impl Into<Scalar>) -> Self {
        let data = match value.into() {
            Scalar::Bool(b) => ElementData::Bool(vec![b]),
            Scalar::Int(i) => ElementData::Int(vec![i]),
            Scalar::Float(x) => ElementData::Float(vec![x]),
            Scalar::Str(s) => ElementData::Str(vec![s]),
        };
        Element {
            shape: Shape::scalar(),
            data,
        }
    }

    /// One-dimensional element of shape `(values.len(),)`
    pub fn from_vec<T: ElementValue>(values: Vec<T>) -> Self {
        let shape = Shape::new([values.len()]);
        Element {
            shape,
            data: T::pack(values),
        }
    }

    /// Element of an explicit shape from flat row-major values
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the number of values differs from what `shape`
    /// holds.
    pub fn from_shape_vec<T: ElementValue>(
        shape: impl Into<Shape>,
        values: Vec<T>,
    ) -> BufferResult<Self> {
        let shape = shape.into();
        if shape.num_elements() != values.len() {
            return Err(BufferError::ShapeMismatch {
                expected: shape,
                actual: Shape::new([values.len()]),
            });
        }
        Ok(Element {
            shape,
            data: T::pack(values),
        })
    }

    /// Element from a nested sequence, converted to `dtype`
    ///
    /// The shape is inferred from the nesting. Scalars (non-array JSON
    /// values) produce the scalar shape.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` for ragged nesting, `null`, objects, or leaves that
    /// cannot be represented as `dtype`.
    pub fn from_nested(value: &Value, dtype: DType) -> BufferResult<Self> {
        let mut dims = Vec::new();
        let mut cursor = value;
        while let Some(items) = cursor.as_array() {
            dims.push(items.len());
            match items.first() {
                Some(first) => cursor = first,
                None => break,
            }
        }

        let mut leaves = Vec::new();
        if !collect_leaves(value, &dims, &mut leaves) {
            return Err(BufferError::type_mismatch(dtype, "ragged nested sequence"));
        }

        let data = match dtype {
            DType::Bool => ElementData::Bool(convert_leaves(&leaves, dtype, Value::as_bool)?),
            DType::Int64 => ElementData::Int(convert_leaves(&leaves, dtype, |v| {
                v.as_i64().or_else(|| v.as_bool().map(i64::from))
            })?),
            DType::Float64 => ElementData::Float(convert_leaves(&leaves, dtype, |v| {
                v.as_f64()
                    .or_else(|| v.as_bool().map(|b| if b { 1.0 } else { 0.0 }))
            })?),
            DType::Str => ElementData::Str(convert_leaves(&leaves, dtype, |v| {
                v.as_str().map(str::to_string)
            })?),
        };

        Ok(Element {
            shape: Shape::new(dims),
            data,
        })
    }

    /// Shape of this element
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Type of this element's values
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Flat row-major values
    pub fn data(&self) -> &ElementData {
        &self.data
    }

    /// Number of values held
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the element holds no values (some extent is zero)
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at a flat row-major index
    pub fn get(&self, index: usize) -> Option<Scalar> {
        self.data.get(index)
    }

    /// The single value of a scalar element
    pub fn to_scalar(&self) -> Option<Scalar> {
        if self.shape.is_scalar() {
            self.data.get(0)
        } else {
            None
        }
    }

    /// All values as floats, for numeric and boolean elements
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match &self.data {
            ElementData::Bool(v) => Some(v.iter().map(|b| if *b { 1.0 } else { 0.0 }).collect()),
            ElementData::Int(v) => Some(v.iter().map(|i| *i as f64).collect()),
            ElementData::Float(v) => Some(v.clone()),
            ElementData::Str(_) => None,
        }
    }
}

fn collect_leaves<'a>(value: &'a Value, dims: &[usize], out: &mut Vec<&'a Value>) -> bool {
    match dims.split_first() {
        None => {
            if value.is_array() {
                return false;
            }
            out.push(value);
            true
        }
        Some((&extent, rest)) => match value.as_array() {
            Some(items) if items.len() == extent => {
                items.iter().all(|item| collect_leaves(item, rest, out))
            }
            _ => false,
        },
    }
}

fn convert_leaves<T>(
    leaves: &[&Value],
    dtype: DType,
    convert: impl Fn(&Value) -> Option<T>,
) -> BufferResult<Vec<T>> {
    leaves
        .iter()
        .map(|&leaf| {
            convert(leaf).ok_or_else(|| {
                BufferError::type_mismatch(dtype, format!("nested sequence containing {}", leaf))
            })
        })
        .collect()
}

/// Declared shape, type and layout hint of a buffer's elements
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementSpec {
    shape: Shape,
    dtype: DType,
    layout: Layout,
}

impl ElementSpec {
    /// Spec with the default row-major layout hint
    pub fn new(shape: impl Into<Shape>, dtype: DType) -> Self {
        ElementSpec {
            shape: shape.into(),
            dtype,
            layout: Layout::default(),
        }
    }

    /// Spec for scalar elements
    pub fn scalar(dtype: DType) -> Self {
        ElementSpec::new(Shape::scalar(), dtype)
    }

    /// Set the layout hint
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Declared element shape
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Declared element type
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Layout hint
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Admit an element: exact shape match, then widening type conversion
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` before `TypeMismatch`.
    pub fn conform(&self, element: Element) -> BufferResult<Element> {
        if element.shape != self.shape {
            return Err(BufferError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: element.shape,
            });
        }
        let actual = element.dtype();
        if !self.dtype.accepts(actual) {
            return Err(BufferError::type_mismatch(self.dtype, actual.name()));
        }
        let Element { shape, data } = element;
        match data.cast(self.dtype) {
            Ok(data) => Ok(Element { shape, data }),
            Err(_) => Err(BufferError::type_mismatch(self.dtype, actual.name())),
        }
    }
}

/// Conversion of a write input into an admitted element
pub trait IntoElement {
    /// Convert `self` and validate it against `spec`
    fn into_element(self, spec: &ElementSpec) -> BufferResult<Element>;
}

impl IntoElement for Element {
    fn into_element(self, spec: &ElementSpec) -> BufferResult<Element> {
        spec.conform(self)
    }
}

impl IntoElement for &Element {
    fn into_element(self, spec: &ElementSpec) -> BufferResult<Element> {
        spec.conform(self.clone())
    }
}

impl IntoElement for Scalar {
    fn into_element(self, spec: &ElementSpec) -> BufferResult<Element> {
        spec.conform(Element::scalar(self))
    }
}

impl IntoElement for Value {
    fn into_element(self, spec: &ElementSpec) -> BufferResult<Element> {
        spec.conform(Element::from_nested(&self, spec.dtype())?)
    }
}

impl IntoElement for &Value {
    fn into_element(self, spec: &ElementSpec) -> BufferResult<Element> {
        spec.conform(Element::from_nested(self, spec.dtype())?)
    }
}

macro_rules! impl_into_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoElement for $ty {
                fn into_element(self, spec: &ElementSpec) -> BufferResult<Element> {
                    spec.conform(Element::scalar(Scalar::from(self)))
                }
            }

            impl IntoElement for Vec<$ty> {
                fn into_element(self, spec: &ElementSpec) -> BufferResult<Element> {
                    spec.conform(Element::from_vec(self))
                }
            }

            impl<const N: usize> IntoElement for [$ty; N] {
                fn into_element(self, spec: &ElementSpec) -> BufferResult<Element> {
                    spec.conform(Element::from_vec(Vec::from(self)))
                }
            }

            impl IntoElement for &[$ty] {
                fn into_element(self, spec: &ElementSpec) -> BufferResult<Element> {
                    spec.conform(Element::from_vec(self.to_vec()))
                }
            }

            impl IntoElement for Vec<Vec<$ty>> {
                fn into_element(self, spec: &ElementSpec) -> BufferResult<Element> {
                    let rows = self.len();
                    let cols = self.first().map_or(0, Vec::len);
                    if self.iter().any(|row| row.len() != cols) {
                        return Err(BufferError::type_mismatch(
                            spec.dtype(),
                            "ragged nested sequence",
                        ));
                    }
                    let flat: Vec<$ty> = self.into_iter().flatten().collect();
                    spec.conform(Element::from_shape_vec([rows, cols], flat)?)
                }
            }
        )*
    };
}

impl_into_element!(bool, i32, i64, f64, String, &str);
