//! The classify → decode → verify pipeline, shared by standalone resources
//! and archive entries.

use crate::assertion::{Assertion, Verdict, evaluate_all};
use crate::config::VerifyConfig;
use crate::error::VerifyError;
use crate::expectations::Expectations;
use crate::format::{Content, FormatKind, archive::scan_archive, classify, decode_bytes};
use crate::report::VerificationResult;
use crate::resource::Resource;

/// Read a resource and decode it as `kind`.
///
/// The byte source is acquired here and released before returning.
///
/// # Errors
///
/// Returns the read error or the decoder's error, tagged with the resource name.
pub fn decode(
    resource: &Resource<'_>,
    kind: FormatKind,
    config: &VerifyConfig,
) -> Result<Content, VerifyError> {
    let bytes = resource.read(config.max_resource_size)?;
    decode_bytes(&bytes, kind, &resource.name, config)
}

/// Decode a resource, then evaluate `assertions` in order.
///
/// Stops at the first failing assertion. An empty assertion list passes as
/// long as the resource decodes.
///
/// # Errors
///
/// Returns an error if the resource cannot be read or decoded. Assertion
/// failures are reported as [`Verdict::Fail`], not as errors.
pub fn verify(
    resource: &Resource<'_>,
    kind: FormatKind,
    assertions: &[Assertion],
    config: &VerifyConfig,
) -> Result<Verdict, VerifyError> {
    let content = decode(resource, kind, config)?;
    let verdict = evaluate_all(assertions, &content);
    tracing::debug!(
        resource = %resource.name,
        %kind,
        assertions = assertions.len(),
        pass = verdict.is_pass(),
        "verified"
    );
    Ok(verdict)
}

/// Classify and verify a resource, capturing any failure in the result.
#[must_use]
pub fn verify_resource(
    resource: &Resource<'_>,
    assertions: &[Assertion],
    config: &VerifyConfig,
) -> VerificationResult {
    let location = resource.location();
    let result = match classify(&resource.name) {
        Ok(kind) => VerificationResult::new(
            &resource.name,
            location,
            Some(kind),
            assertions.len(),
            verify(resource, kind, assertions, config),
        ),
        Err(err) => VerificationResult::new(&resource.name, location, None, assertions.len(), Err(err)),
    };
    if !result.outcome.is_pass() {
        tracing::warn!("{}", result.format_human_readable());
    }
    result
}

/// Verify every entry of a ZIP archive that has expectations, in archive order.
///
/// Entries are verified through the same path as standalone resources. Nested
/// archives are followed up to `config.max_archive_depth` levels. A failing
/// entry never prevents its siblings from being verified.
///
/// # Errors
///
/// Returns an error only if the archive itself cannot be indexed.
pub fn verify_archive(
    archive_name: &str,
    bytes: &[u8],
    expectations: &Expectations,
    config: &VerifyConfig,
) -> Result<Vec<VerificationResult>, VerifyError> {
    let mut results = Vec::new();
    let walk = ArchiveWalk {
        expectations,
        config,
        include_unlisted: false,
    };
    walk.entries(archive_name, bytes, 0, &mut results)?;
    Ok(results)
}

/// Shared state for verifying a resource and descending into archives.
pub struct ArchiveWalk<'e> {
    pub expectations: &'e Expectations,
    pub config: &'e VerifyConfig,
    /// Decode classifiable resources that have no expectations.
    pub include_unlisted: bool,
}

impl ArchiveWalk<'_> {
    /// Verify `resource` against its expectations and, if it is an archive,
    /// every entry inside it.
    pub fn resource(
        &self,
        resource: &Resource<'_>,
        depth: usize,
        results: &mut Vec<VerificationResult>,
    ) {
        let kind = classify(&resource.name).ok();
        let reported = match self.expectations.get(&resource.name) {
            Some(assertions) => {
                results.push(verify_resource(resource, assertions, self.config));
                true
            }
            None if self.include_unlisted && kind.is_some() => {
                results.push(verify_resource(resource, &[], self.config));
                true
            }
            None => false,
        };

        if kind != Some(FormatKind::Archive) {
            return;
        }
        if depth >= self.config.max_archive_depth {
            tracing::warn!(
                archive = %resource.location(),
                depth,
                "nested archive not opened: max_archive_depth reached"
            );
            return;
        }

        let location = resource.location();
        let nested = resource
            .read(self.config.max_resource_size)
            .and_then(|bytes| self.entries(&location, &bytes, depth, results));
        if let Err(err) = nested
            && !reported
        {
            results.push(VerificationResult::new(
                &resource.name,
                location,
                kind,
                0,
                Err(err),
            ));
        }
    }

    fn entries(
        &self,
        archive_name: &str,
        bytes: &[u8],
        depth: usize,
        results: &mut Vec<VerificationResult>,
    ) -> Result<(), VerifyError> {
        let index = scan_archive(archive_name, bytes)?;
        tracing::debug!(archive = archive_name, entries = index.len(), depth, "scanning archive");
        for entry in index.files() {
            let resource = Resource::archive_entry(archive_name, bytes, entry.name.clone());
            self.resource(&resource, depth + 1, results);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::archive::build_test_zip;
    use crate::format::pdf::build_test_pdf;
    use crate::report::Outcome;

    fn csv_expectations() -> Expectations {
        let mut expectations = Expectations::new();
        expectations.insert(
            "student.csv",
            vec![Assertion::ContainsRows(vec![vec![
                "Ivan".to_owned(),
                "Ivanov".to_owned(),
            ]])],
        );
        expectations
    }

    #[test]
    fn test_verify_with_no_assertions_passes() {
        let resource = Resource::memory("notes.txt", b"anything".as_slice());
        let verdict = verify(&resource, FormatKind::Text, &[], &VerifyConfig::default()).unwrap();
        assert_eq!(verdict, Verdict::Pass);
    }

    #[test]
    fn test_verify_decode_error_is_err() {
        let resource = Resource::memory("broken.pdf", b"%PDF-garbage".as_slice());
        let err = verify(
            &resource,
            FormatKind::Pdf,
            &[Assertion::PageCount(1)],
            &VerifyConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.resource(), "broken.pdf");
    }

    #[test]
    fn test_verify_resource_unknown_format() {
        let resource = Resource::memory("README.md", b"# JUnit 5".as_slice());
        let result = verify_resource(&resource, &[], &VerifyConfig::default());
        assert_eq!(result.kind, None);
        assert!(matches!(
            result.outcome,
            Outcome::Failed {
                kind: crate::error::FailureKind::UnknownFormat,
                ..
            }
        ));
    }

    #[test]
    fn test_verify_archive_checks_entry_content() {
        let pdf = build_test_pdf(&["page one", "page 123"]);
        let bytes = build_test_zip(&[
            ("student.csv", b"Name,Surname\nIvan,Ivanov\n".as_slice()),
            ("guide.pdf", pdf.as_slice()),
            ("ignored.txt", b"not expected".as_slice()),
        ]);
        let mut expectations = csv_expectations();
        expectations.insert("guide.pdf", vec![Assertion::PageCount(2)]);

        let results =
            verify_archive("bundle.zip", &bytes, &expectations, &VerifyConfig::default()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].resource, "student.csv");
        assert_eq!(results[0].location, "bundle.zip!student.csv");
        assert_eq!(results[1].resource, "guide.pdf");
        assert!(results.iter().all(|r| r.outcome.is_pass()), "{results:?}");
    }

    #[test]
    fn test_failing_entry_does_not_stop_siblings() {
        let bytes = build_test_zip(&[
            ("guide.pdf", b"corrupt".as_slice()),
            ("student.csv", b"Ivan,Ivanov\n".as_slice()),
        ]);
        let mut expectations = csv_expectations();
        expectations.insert("guide.pdf", vec![Assertion::PageCount(1)]);

        let results =
            verify_archive("bundle.zip", &bytes, &expectations, &VerifyConfig::default()).unwrap();
        assert_eq!(results.len(), 2);
        assert!(!results[0].outcome.is_pass());
        assert!(results[1].outcome.is_pass());
    }

    #[test]
    fn test_nested_archives_respect_depth() {
        let inner = build_test_zip(&[("student.csv", b"Ivan,Ivanov\n".as_slice())]);
        let outer = build_test_zip(&[("inner.zip", inner.as_slice())]);
        let expectations = csv_expectations();

        let results =
            verify_archive("outer.zip", &outer, &expectations, &VerifyConfig::default()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].location, "outer.zip!inner.zip!student.csv");
        assert!(results[0].outcome.is_pass());

        let mut shallow = VerifyConfig::default();
        shallow.max_archive_depth = 1;
        let results = verify_archive("outer.zip", &outer, &expectations, &shallow).unwrap();
        assert!(results.is_empty(), "{results:?}");
    }

    #[test]
    fn test_unreadable_archive_is_error() {
        let err = verify_archive(
            "fake.zip",
            b"nope",
            &Expectations::new(),
            &VerifyConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, VerifyError::Decode { .. }));
    }
}
