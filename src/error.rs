//! Error Type Definition Module
//!
//! This module defines the error types that may be encountered while turning
//! a sequence of images into an EPUB package. All errors are uniformly wrapped
//! in the `EpubError` enumeration for convenient error handling by the caller.
//!
//! ## Main Error Types
//!
//! - [EpubError] - Enumeration of errors raised while preparing input or packaging the book
//! - [EpubBuilderError] - Configuration inconsistencies detected before synthesis starts

use thiserror::Error;

/// Types of errors that can occur during EPUB synthesis
///
/// This enumeration covers malformed input images, failures while serializing
/// the package documents and failures while writing the compressed container.
/// Every variant is terminal for the synthesis call that produced it.
#[derive(Debug, Error)]
pub enum EpubError {
    /// ZIP archive related errors
    ///
    /// Errors occur when writing an entry into the container fails.
    #[error("Archive error: {source}")]
    ArchiveError { source: zip::result::ZipError },

    /// Base64 decoding error
    ///
    /// This error occurs when the payload of a data URL is not valid base64.
    #[error("Decode error: {source}")]
    Base64DecodeError { source: base64::DecodeError },

    /// Data Decoding Error - Null data
    ///
    /// This error occurs when an image payload contains no bytes at all.
    #[error("Decode error: The data is empty.")]
    EmptyDataError,

    #[error("Epub builder error: {source}")]
    EpubBuilderError { source: EpubBuilderError },

    #[error("IO error: {source}")]
    IOError { source: std::io::Error },

    /// Malformed data URL error
    ///
    /// Triggered when an image handed over as a data URL lacks the
    /// `data:<mime>;base64,` prefix.
    #[error("Malformed data URL: The image \"{name}\" is not a base64 data URL.")]
    MalformedDataUrl { name: String },

    /// QuickXml error
    ///
    /// This error occurs when writing XML documents using the QuickXml library.
    #[error("QuickXml error: {source}")]
    QuickXmlError { source: quick_xml::Error },

    /// Unknown file format error
    ///
    /// Triggered when the type of an image payload cannot be inferred from its content.
    #[error("Unknown file format: Unable to analyze the type of \"{name}\".")]
    UnknownFileFormat { name: String },

    /// Unsupported image type error
    ///
    /// Triggered when a payload is recognized but it is not an image.
    #[error("Unsupported image type: \"{name}\" has the non-image type \"{mime}\".")]
    UnsupportedImageType { name: String, mime: String },

    /// UTF-8 decoding error
    ///
    /// This error occurs when a generated document is not valid UTF-8.
    #[error("Decode error: {source}")]
    Utf8DecodeError { source: std::string::FromUtf8Error },
}

impl From<zip::result::ZipError> for EpubError {
    fn from(value: zip::result::ZipError) -> Self {
        EpubError::ArchiveError { source: value }
    }
}

impl From<base64::DecodeError> for EpubError {
    fn from(value: base64::DecodeError) -> Self {
        EpubError::Base64DecodeError { source: value }
    }
}

impl From<quick_xml::Error> for EpubError {
    fn from(value: quick_xml::Error) -> Self {
        EpubError::QuickXmlError { source: value }
    }
}

impl From<std::io::Error> for EpubError {
    fn from(value: std::io::Error) -> Self {
        EpubError::IOError { source: value }
    }
}

impl From<std::string::FromUtf8Error> for EpubError {
    fn from(value: std::string::FromUtf8Error) -> Self {
        EpubError::Utf8DecodeError { source: value }
    }
}

impl From<EpubBuilderError> for EpubError {
    fn from(value: EpubBuilderError) -> Self {
        EpubError::EpubBuilderError { source: value }
    }
}

#[cfg(test)]
impl PartialEq for EpubError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MalformedDataUrl { name: l_name }, Self::MalformedDataUrl { name: r_name }) => {
                l_name == r_name
            }
            (
                Self::UnknownFileFormat { name: l_name },
                Self::UnknownFileFormat { name: r_name },
            ) => l_name == r_name,
            (
                Self::UnsupportedImageType {
                    name: l_name,
                    mime: l_mime,
                },
                Self::UnsupportedImageType {
                    name: r_name,
                    mime: r_mime,
                },
            ) => l_name == r_name && l_mime == r_mime,
            (
                Self::Base64DecodeError { source: l_source },
                Self::Base64DecodeError { source: r_source },
            ) => l_source == r_source,
            (
                Self::Utf8DecodeError { source: l_source },
                Self::Utf8DecodeError { source: r_source },
            ) => l_source == r_source,
            (
                Self::EpubBuilderError { source: l_source },
                Self::EpubBuilderError { source: r_source },
            ) => l_source == r_source,

            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

/// Types of errors that can occur before an EPUB is built
///
/// These errors describe an inconsistent input snapshot: the metadata or the
/// builder configuration does not describe a book that can be packaged. They
/// are raised by the eager validation step, before any document is generated.
#[derive(Debug, Error)]
#[cfg_attr(test, derive(PartialEq))]
pub enum EpubBuilderError {
    /// Chapter out of range error
    ///
    /// This error is triggered when a chapter points at a content page that does
    /// not exist. Packaging it anyway would produce a dangling navigation link.
    #[error(
        "Chapter '{title}' points at page index {page_index}, but the book only has {page_count} content pages."
    )]
    ChapterOutOfRange {
        title: String,
        page_index: usize,
        page_count: usize,
    },

    /// Empty image list error
    ///
    /// This error is triggered when attempting to build an EPUB without any content image.
    #[error("Need at least one content image.")]
    EmptyImageList,

    /// Invalid compression level error
    ///
    /// Deflate only knows the levels 0 to 9.
    #[error("Compression level {level} is out of the range 0 to 9.")]
    InvalidCompressionLevel { level: i64 },

    /// Invalid page size error
    ///
    /// This error is triggered when custom page dimensions fall outside 100 to 2000 pixels.
    #[error("Page size {width}x{height} is out of the range 100 to 2000 pixels.")]
    InvalidPageSize { width: u32, height: u32 },
}
