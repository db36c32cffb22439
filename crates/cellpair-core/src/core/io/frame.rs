/// One configuration: per-particle labels and flat coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub comment: String,
    pub labels: Vec<String>,
    pub coords: Vec<f64>,
    pub ndim: usize,
}

impl Frame {
    /// Creates a frame with every particle labelled `label`.
    pub fn uniform(label: &str, coords: Vec<f64>, ndim: usize) -> Self {
        let count = coords.len() / ndim.max(1);
        Self {
            comment: String::new(),
            labels: vec![label.to_string(); count],
            coords,
            ndim,
        }
    }

    pub fn particle_count(&self) -> usize {
        self.labels.len()
    }

    /// Same labels and layout with different per-particle values, e.g. a gradient.
    pub fn with_values(&self, comment: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            comment: comment.into(),
            labels: self.labels.clone(),
            coords: values,
            ndim: self.ndim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_labels_every_particle() {
        let frame = Frame::uniform("Ar", vec![0.0; 6], 3);
        assert_eq!(frame.particle_count(), 2);
        assert_eq!(frame.labels, vec!["Ar", "Ar"]);
    }

    #[test]
    fn with_values_keeps_labels() {
        let frame = Frame::uniform("X", vec![1.0, 2.0], 2);
        let gradient = frame.with_values("gradient", vec![0.5, -0.5]);
        assert_eq!(gradient.labels, frame.labels);
        assert_eq!(gradient.coords, vec![0.5, -0.5]);
        assert_eq!(gradient.comment, "gradient");
    }
}
