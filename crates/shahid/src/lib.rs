//! Resolver for the Shahid streaming service.
//!
//! Episodes, clips and movies resolve into a [`media::MediaItem`] carrying the
//! HLS formats of the playout manifest merged with the public catalogue
//! metadata. Shows resolve into a [`media::Playlist`] whose pages are fetched
//! lazily from the signed proxy API.
//!
//! ```no_run
//! use shahid_parser::extractor::default_factory;
//! use shahid_parser::media::Extraction;
//!
//! # async fn run() -> Result<(), shahid_parser::extractor::error::ExtractorError> {
//! let factory = default_factory()?;
//! let extractor = factory.create_extractor(
//!     "https://shahid.mbc.net/ar/movies/some-movie/movie-151746",
//!     None,
//!     None,
//! )?;
//! if let Extraction::Media(item) = extractor.extract().await? {
//!     println!("{} ({} formats)", item.title, item.formats.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod extractor;
pub mod media;
