use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid content rect: left={left}, top={top}, right={right}, bottom={bottom}")]
    InvalidContentRect {
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
