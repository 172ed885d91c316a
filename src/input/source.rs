use crate::core::{Route, Sample};
use crate::error::LoadError;
use crate::input::parse_route;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Trait for anything that can supply the recorded route once at startup
///
/// Implementations:
/// - Route files on disk (JSON or CSV)
/// - In-memory samples for tests and demos
#[async_trait]
pub trait RouteSource: Send + Sync {
    /// Human-readable origin, used in log messages
    fn describe(&self) -> String;

    /// Retrieve and decode the route
    async fn fetch(&self) -> Result<Route, LoadError>;
}

/// Route stored in a JSON or CSV file
#[derive(Debug, Clone)]
pub struct FileRouteSource {
    path: PathBuf,
}

impl FileRouteSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RouteSource for FileRouteSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Route, LoadError> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!("Read {} bytes from {}", data.len(), self.path.display());
        parse_route(&data)
    }
}

/// Route held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticRouteSource {
    samples: Vec<Sample>,
}

impl StaticRouteSource {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }
}

#[async_trait]
impl RouteSource for StaticRouteSource {
    fn describe(&self) -> String {
        format!("memory ({} samples)", self.samples.len())
    }

    async fn fetch(&self) -> Result<Route, LoadError> {
        Route::new(self.samples.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadFailureKind;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_source_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "latitude,longitude,timestamp").unwrap();
        writeln!(file, "12.9716,77.5946,2024-05-01T10:00:00Z").unwrap();
        writeln!(file, "12.9720,77.5950,2024-05-01T10:00:10Z").unwrap();

        let source = FileRouteSource::new(file.path());
        let route = source.fetch().await.unwrap();

        assert_eq!(route.len(), 2);
        assert_eq!(source.describe(), file.path().display().to_string());
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileRouteSource::new("/nonexistent/dummyRoutes.json");
        let err = source.fetch().await.unwrap_err();

        assert!(matches!(err, LoadError::Io { .. }));
        assert_eq!(err.kind(), LoadFailureKind::RouteLoadFailure);
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticRouteSource::new(vec![Sample::new(1.0, 2.0)]);
        assert_eq!(source.fetch().await.unwrap().len(), 1);

        let empty = StaticRouteSource::default();
        let err = empty.fetch().await.unwrap_err();
        assert_eq!(err.kind(), LoadFailureKind::EmptyRouteFailure);
    }
}
