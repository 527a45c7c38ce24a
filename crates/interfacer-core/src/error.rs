use interfacer_classpath::ClasspathError;
use interfacer_syntax::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrofitError {
    #[error(
        "no interface source configured: set an interfaces directory, or interface packages together with a classpath"
    )]
    NoInterfaceSource,
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Classpath(#[from] ClasspathError),
    #[error("retrofitting did not converge within {passes} passes")]
    NoConvergence { passes: usize },
}
