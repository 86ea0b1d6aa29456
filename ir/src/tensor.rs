// tensor.rs — Native in-memory tensors
//
// A Tensor is a named, shaped block of typed elements. The element count is
// checked against the dims at construction, so every Tensor in the IR is
// internally consistent. Strings are stored as raw bytes, as ONNX does.

use std::fmt;

use crate::error::{IrError, Result};
use crate::types::{DataType, Shape};

/// Typed element storage, flattened in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    Float(Vec<f32>),
    Double(Vec<f64>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Uint8(Vec<u8>),
    Bool(Vec<bool>),
    String(Vec<Vec<u8>>),
}

impl TensorData {
    pub fn dtype(&self) -> DataType {
        match self {
            TensorData::Float(_) => DataType::Float,
            TensorData::Double(_) => DataType::Double,
            TensorData::Int32(_) => DataType::Int32,
            TensorData::Int64(_) => DataType::Int64,
            TensorData::Uint8(_) => DataType::Uint8,
            TensorData::Bool(_) => DataType::Bool,
            TensorData::String(_) => DataType::String,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TensorData::Float(v) => v.len(),
            TensorData::Double(v) => v.len(),
            TensorData::Int32(v) => v.len(),
            TensorData::Int64(v) => v.len(),
            TensorData::Uint8(v) => v.len(),
            TensorData::Bool(v) => v.len(),
            TensorData::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    name: Option<String>,
    dims: Vec<i64>,
    data: TensorData,
}

impl Tensor {
    /// Build a tensor, checking that `data` holds exactly `product(dims)` elements.
    pub fn new(dims: Vec<i64>, data: TensorData) -> Result<Self> {
        if let Some(bad) = dims.iter().find(|&&d| d < 0) {
            return Err(IrError::decode(format!("negative tensor dimension {bad}")));
        }
        let expected = if dims.contains(&0) {
            0
        } else {
            dims.iter()
                .try_fold(1i64, |acc, &d| acc.checked_mul(d))
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| {
                    IrError::decode(format!("element count of tensor shape {:?} overflows", dims))
                })?
        };
        if expected != data.len() {
            return Err(IrError::decode(format!(
                "tensor of shape {:?} needs {} elements, got {}",
                dims,
                expected,
                data.len()
            )));
        }
        Ok(Tensor {
            name: None,
            dims,
            data,
        })
    }

    /// 1-D f32 tensor.
    pub fn from_f32(values: Vec<f32>) -> Self {
        Self::vector(TensorData::Float(values))
    }

    /// 1-D i64 tensor.
    pub fn from_i64(values: Vec<i64>) -> Self {
        Self::vector(TensorData::Int64(values))
    }

    /// 1-D byte-string tensor.
    pub fn from_strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self::vector(TensorData::String(
            values.into_iter().map(|s| s.as_ref().to_vec()).collect(),
        ))
    }

    pub fn scalar_f32(value: f32) -> Self {
        Self::scalar(TensorData::Float(vec![value]))
    }

    pub fn scalar_i64(value: i64) -> Self {
        Self::scalar(TensorData::Int64(vec![value]))
    }

    pub fn scalar_string(value: impl AsRef<[u8]>) -> Self {
        Self::scalar(TensorData::String(vec![value.as_ref().to_vec()]))
    }

    fn vector(data: TensorData) -> Self {
        Tensor {
            name: None,
            dims: vec![data.len() as i64],
            data,
        }
    }

    fn scalar(data: TensorData) -> Self {
        Tensor {
            name: None,
            dims: Vec::new(),
            data,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn dims(&self) -> &[i64] {
        &self.dims
    }

    pub fn shape(&self) -> Shape {
        Shape::fixed(&self.dims)
    }

    pub fn dtype(&self) -> DataType {
        self.data.dtype()
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            TensorData::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<&[i64]> {
        match &self.data {
            TensorData::Int64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[Vec<u8>]> {
        match &self.data {
            TensorData::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor<{},{}>", self.dtype(), self.shape())?;
        if let Some(name) = &self.name {
            write!(f, "(name='{name}')")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_count_must_match_dims() {
        let ok = Tensor::new(vec![2, 2], TensorData::Int64(vec![1, 2, 3, 4])).unwrap();
        assert_eq!(ok.shape(), Shape::fixed(&[2, 2]));

        let err = Tensor::new(vec![2, 2], TensorData::Int64(vec![1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("needs 4 elements, got 3"));
    }

    #[test]
    fn scalar_has_rank_zero_and_one_element() {
        let t = Tensor::scalar_f32(1.5);
        assert!(t.dims().is_empty());
        assert_eq!(t.numel(), 1);
        assert_eq!(t.as_f32(), Some(&[1.5f32][..]));
    }

    #[test]
    fn negative_dims_rejected() {
        assert!(Tensor::new(vec![-1], TensorData::Float(vec![])).is_err());
    }

    #[test]
    fn overflowing_element_count_is_an_error() {
        let err = Tensor::new(vec![i64::MAX, 2], TensorData::Float(vec![])).unwrap_err();
        assert!(err.to_string().contains("overflows"), "{err}");
        // A zero dimension still gives an empty tensor.
        let empty = Tensor::new(vec![i64::MAX, 2, 0], TensorData::Float(vec![])).unwrap();
        assert_eq!(empty.numel(), 0);
    }

    #[test]
    fn display_includes_name() {
        let t = Tensor::from_f32(vec![1.0, 2.0, 3.0]).with_name("w");
        assert_eq!(t.to_string(), "Tensor<FLOAT,[3]>(name='w')");
        assert_eq!(Tensor::from_strings(["a", "b"]).dtype(), DataType::String);
    }
}
