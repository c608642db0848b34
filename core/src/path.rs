//! Resource paths built one segment at a time.
//!
//! A [`ResourcePath`] is an ordered list of [`PathSegment`]s, each either a
//! name (`personas`) or an integer index (`123`). Integers keep their type
//! until the URL is rendered, where they print as plain decimal text.

use std::fmt;

/// One level of a resource hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Name(String),
    Index(i64),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Name(name) => f.write_str(name),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Name(name.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(name: String) -> Self {
        PathSegment::Name(name)
    }
}

impl From<&String> for PathSegment {
    fn from(name: &String) -> Self {
        PathSegment::Name(name.clone())
    }
}

macro_rules! index_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PathSegment {
                fn from(index: $ty) -> Self {
                    PathSegment::Index(i64::from(index))
                }
            }
        )*
    };
}

index_from!(i8, i16, i32, i64, u8, u16, u32);

// Values past i64::MAX still render as their decimal text.
macro_rules! wide_index_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PathSegment {
                fn from(index: $ty) -> Self {
                    i64::try_from(index)
                        .map(PathSegment::Index)
                        .unwrap_or_else(|_| PathSegment::Name(index.to_string()))
                }
            }
        )*
    };
}

wide_index_from!(u64, usize);

/// Ordered sequence of segments. The empty path is the root resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    segments: Vec<PathSegment>,
}

impl ResourcePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this path with `segment` appended.
    pub fn join(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render as a URL path: `/` followed by the segments joined with `/`.
    pub fn to_url_path(&self) -> String {
        let mut out = String::from("/");
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            out.push_str(&segment.to_string());
        }
        out
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url_path())
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for ResourcePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<PathSegment>> Extend<S> for ResourcePath {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.segments.extend(iter.into_iter().map(Into::into));
    }
}

impl<'a> IntoIterator for &'a ResourcePath {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
