use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Read-only view of a build artifact, as far as the cache is concerned.
///
/// The cache never computes fingerprints or checksums itself; it only reads
/// what the build pipeline recorded on the artifact.
pub trait ArtifactIdentity {
    /// Location of the artifact's bytes on disk. The base name doubles as
    /// the fallback identity token.
    fn path(&self) -> &Path;

    /// Authoritative fingerprint of the package this artifact was compiled
    /// from, if the artifact carries a compiled spec that names a package.
    fn package_fingerprint(&self) -> Option<&str>;

    /// `(algorithm, digest)` pairs in no particular order.
    fn checksums(&self) -> Vec<(&str, &str)>;
}

/// Digests recorded for an artifact, keyed by algorithm name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums(BTreeMap<String, String>);

impl Checksums {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a digest, replacing any previous digest for the same algorithm.
    pub fn insert(&mut self, algorithm: impl Into<String>, digest: impl Into<String>) {
        self.0.insert(algorithm.into(), digest.into());
    }

    pub fn get(&self, algorithm: &str) -> Option<&str> {
        self.0.get(algorithm).map(String::as_str)
    }

    pub fn remove(&mut self, algorithm: &str) -> Option<String> {
        self.0.remove(algorithm)
    }

    /// All `(algorithm, digest)` pairs, ordered by algorithm.
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.0
            .iter()
            .map(|(alg, digest)| (alg.as_str(), digest.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<A: Into<String>, D: Into<String>> FromIterator<(A, D)> for Checksums {
    fn from_iter<I: IntoIterator<Item = (A, D)>>(iter: I) -> Self {
        let mut checksums = Self::new();
        for (alg, digest) in iter {
            checksums.insert(alg, digest);
        }
        checksums
    }
}

/// A package as referenced by a compiled spec.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    fingerprint: String,
}

impl Package {
    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self {
            fingerprint: fingerprint.into(),
        }
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// The compiled build spec an artifact was produced from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileSpec {
    pub package: Option<Package>,
}

impl CompileSpec {
    pub fn for_package(package: Package) -> Self {
        Self {
            package: Some(package),
        }
    }
}

/// A build output on disk together with its provenance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageArtifact {
    pub path: PathBuf,
    #[serde(default)]
    pub compile_spec: Option<CompileSpec>,
    #[serde(default)]
    pub checksums: Checksums,
}

impl PackageArtifact {
    /// An artifact with no compiled spec and no checksums.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            compile_spec: None,
            checksums: Checksums::new(),
        }
    }

    pub fn with_compile_spec(mut self, spec: CompileSpec) -> Self {
        self.compile_spec = Some(spec);
        self
    }

    pub fn with_checksum(mut self, algorithm: impl Into<String>, digest: impl Into<String>) -> Self {
        self.checksums.insert(algorithm, digest);
        self
    }
}

impl ArtifactIdentity for PackageArtifact {
    fn path(&self) -> &Path {
        &self.path
    }

    fn package_fingerprint(&self) -> Option<&str> {
        self.compile_spec
            .as_ref()
            .and_then(|spec| spec.package.as_ref())
            .map(Package::fingerprint)
    }

    fn checksums(&self) -> Vec<(&str, &str)> {
        self.checksums.list()
    }
}
