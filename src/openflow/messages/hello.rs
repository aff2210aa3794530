//! Hello and version negotiation

use crate::openflow::version::Version;

pub const HELLO_ELEM_VERSIONBITMAP: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelloElement {
    /// Bit `n` tells whether wire version `n` is supported
    VersionBitmap(Vec<bool>),
}

/// The first message on a connection. OpenFlow 1.0 hellos never carry
/// elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hello {
    pub elements: Vec<HelloElement>,
}

impl Hello {
    /// Constructs a hello advertising `versions` in a version bitmap
    pub fn with_versions(versions: &[Version]) -> Hello {
        let highest = versions.iter().map(|v| v.wire()).max().unwrap_or(0) as usize;
        let words = highest / 32 + 1;
        let mut bitmap = vec![false; words * 32];
        for v in versions {
            bitmap[v.wire() as usize] = true;
        }
        Hello {
            elements: vec![HelloElement::VersionBitmap(bitmap)],
        }
    }

    /// The bitmap of the first version bitmap element
    pub fn version_bitmap(&self) -> Option<&[bool]> {
        self.elements.first().map(|e| match *e {
            HelloElement::VersionBitmap(ref bits) => &bits[..],
        })
    }

    /// The supported versions advertised in the bitmap, oldest first
    pub fn versions(&self) -> Vec<Version> {
        let bitmap = match self.version_bitmap() {
            Some(bits) => bits,
            None => return vec![],
        };
        Version::ALL
            .iter()
            .cloned()
            .filter(|v| bitmap.get(v.wire() as usize).cloned().unwrap_or(false))
            .collect()
    }

    /// Picks the version to talk to a peer whose hello was sent with
    /// header version `peer`. Without a bitmap the lower of both highest
    /// versions is used.
    pub fn negotiate(&self, peer: Version, ours: &[Version]) -> Option<Version> {
        if self.version_bitmap().is_some() {
            let theirs = self.versions();
            ours.iter().cloned().filter(|v| theirs.contains(v)).max()
        }
        else {
            ours.iter().cloned().filter(|v| *v <= peer).max()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_from_versions() {
        let hello = Hello::with_versions(&[Version::V1_0, Version::V1_3]);
        let bits = hello.version_bitmap().unwrap();
        assert_eq!(32, bits.len());
        assert!(bits[1] && bits[4]);
        assert_eq!(2, bits.iter().filter(|b| **b).count());
        assert_eq!(vec![Version::V1_0, Version::V1_3], hello.versions());
    }

    #[test]
    fn negotiation() {
        let hello = Hello::with_versions(&[Version::V1_0, Version::V1_3, Version::V1_5]);
        assert_eq!(
            Some(Version::V1_3),
            hello.negotiate(Version::V1_5, &[Version::V1_3, Version::V1_4])
        );
        assert_eq!(None, hello.negotiate(Version::V1_5, &[Version::V1_4]));

        let legacy = Hello::default();
        assert_eq!(
            Some(Version::V1_0),
            legacy.negotiate(Version::V1_0, &[Version::V1_0, Version::V1_3])
        );
    }
}
