/// Interactive editing state: the current image plus what has been applied to it.
///
/// Operations never touch `current` in place. A successful operation replaces
/// it with the new buffer; a failed one leaves it exactly as it was.
use log::{debug, info};

use crate::buffer::{ImageBuffer, ImageError};
use crate::pipeline::Operation;

#[derive(Debug, Clone)]
pub struct Session {
    current: ImageBuffer,
    history: Vec<Operation>,
}

impl Session {
    pub fn new(image: ImageBuffer) -> Self {
        Self {
            current: image,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &ImageBuffer {
        &self.current
    }

    /// Operations applied so far, oldest first.
    pub fn history(&self) -> &[Operation] {
        &self.history
    }

    pub fn apply(&mut self, op: Operation) -> Result<&ImageBuffer, ImageError> {
        debug!("session: applying {}", op);
        let next = op.apply(&self.current)?;
        self.current = next;
        self.history.push(op);
        info!("applied {} ({} so far)", op.describe(), self.history.len());
        Ok(&self.current)
    }

    pub fn into_current(self) -> ImageBuffer {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge_detect::EdgeOperator;
    use crate::params::{Gamma, KernelSize};
    use ndarray::array;

    #[test]
    fn test_apply_replaces_current() {
        let img = ImageBuffer::new(array![[0, 50], [100, 200]], 255).unwrap();
        let mut session = Session::new(img.clone());
        session.apply(Operation::ContrastStretch).unwrap();
        assert_ne!(session.current(), &img);
        assert_eq!(session.current().get(0, 0), Some(10));
        assert_eq!(session.history(), &[Operation::ContrastStretch]);
    }

    #[test]
    fn test_failed_operation_keeps_buffer() {
        let img = ImageBuffer::filled(4, 4, 30, 255).unwrap();
        let mut session = Session::new(img.clone());
        session
            .apply(Operation::MedianFilter(KernelSize::DEFAULT))
            .unwrap();
        let before = session.current().clone();

        let err = session.apply(Operation::ContrastStretch).unwrap_err();
        assert_eq!(err, ImageError::DegenerateRange { value: 30 });
        assert_eq!(session.current(), &before);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_chain_of_operations() {
        let data: Vec<u8> = (0..36).map(|v| (v * 5) as u8).collect();
        let img = ImageBuffer::from_vec(6, 6, 255, data).unwrap();
        let mut session = Session::new(img);
        for op in [
            Operation::PowerLaw(Gamma::new(0.8).unwrap()),
            Operation::MeanFilter(KernelSize::DEFAULT),
            Operation::Edges(EdgeOperator::Prewitt),
        ] {
            session.apply(op).unwrap();
        }
        assert_eq!(session.history().len(), 3);
        let out = session.into_current();
        assert_eq!((out.rows(), out.cols()), (6, 6));
        assert_eq!(out.max_intensity(), 255);
    }
}
