use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The arguments do not fit the selected mode.
    #[display("{_0}")]
    Usage(#[error(not(source))] &'static str),
    #[display("could not load configuration")]
    Config,
    #[display("could not catalog corpus")]
    Survey,
    #[display("could not read listing")]
    ReadListing,
    #[display("could not write listing")]
    Listing,
    #[display("could not open target")]
    Storage,
    /// Some placements failed; the rest were organized.
    #[display("{_0} file(s) could not be organized")]
    Incomplete(#[error(not(source))] usize),
}
