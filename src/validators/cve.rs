//! Controlled vocabulary enumerations (CVEs)
//!
//! Each [`Vocabulary`] is a named, version-scoped set of legal tokens. Entries
//! carry their own availability window, since ISM revisions add and retire
//! tokens between DDMS versions. Membership is exact and case-sensitive.
//!
//! Whether a non-member is a hard failure or a warning is decided in one place,
//! [`validate`], from the context's [`CvePolicy`](crate::config::CvePolicy).

use crate::config::Context;
use crate::error::{Error, Result};
use crate::versions::DdmsVersion;
use std::collections::HashMap;

use super::exceptions::ValidationMessage;

/// A named controlled vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    /// US and NATO classification levels
    Classification,
    /// Owner/producer countries and organizations
    OwnerProducer,
    /// SCI control systems
    SciControls,
    /// Dissemination controls
    DisseminationControls,
    /// Non-IC markings
    NonIcMarkings,
    /// Atomic energy markings
    AtomicEnergyMarkings,
    /// Release and display-only audiences
    ReleasableTo,
    /// Declassification exemptions
    DeclassException,
    /// Type of exempted source
    TypeOfExemptedSource,
    /// Notice types
    NoticeType,
    /// Point-of-contact types
    PocType,
}

impl Vocabulary {
    /// The CVE file name the vocabulary is published as
    pub fn file_name(&self) -> &'static str {
        match self {
            Vocabulary::Classification => "CVEnumISMClassificationAll.xml",
            Vocabulary::OwnerProducer => "CVEnumISMOwnerProducer.xml",
            Vocabulary::SciControls => "CVEnumISMSCIControls.xml",
            Vocabulary::DisseminationControls => "CVEnumISMDissem.xml",
            Vocabulary::NonIcMarkings => "CVEnumISMNonIC.xml",
            Vocabulary::AtomicEnergyMarkings => "CVEnumISMAtomicEnergyMarkings.xml",
            Vocabulary::ReleasableTo => "CVEnumISMRelTo.xml",
            Vocabulary::DeclassException => "CVEnumISM25X.xml",
            Vocabulary::TypeOfExemptedSource => "CVEnumISMSourceMarked.xml",
            Vocabulary::NoticeType => "CVEnumISMNotice.xml",
            Vocabulary::PocType => "CVEnumISMPocType.xml",
        }
    }

    fn entries(&self) -> &'static [Entry] {
        match self {
            Vocabulary::Classification => CLASSIFICATION,
            Vocabulary::OwnerProducer => OWNER_PRODUCER,
            Vocabulary::SciControls => SCI_CONTROLS,
            Vocabulary::DisseminationControls => DISSEMINATION_CONTROLS,
            Vocabulary::NonIcMarkings => NON_IC_MARKINGS,
            Vocabulary::AtomicEnergyMarkings => ATOMIC_ENERGY_MARKINGS,
            Vocabulary::ReleasableTo => RELEASABLE_TO,
            Vocabulary::DeclassException => DECLASS_EXCEPTION,
            Vocabulary::TypeOfExemptedSource => TYPE_OF_EXEMPTED_SOURCE,
            Vocabulary::NoticeType => NOTICE_TYPE,
            Vocabulary::PocType => POC_TYPE,
        }
    }

    const ALL: [Vocabulary; 11] = [
        Vocabulary::Classification,
        Vocabulary::OwnerProducer,
        Vocabulary::SciControls,
        Vocabulary::DisseminationControls,
        Vocabulary::NonIcMarkings,
        Vocabulary::AtomicEnergyMarkings,
        Vocabulary::ReleasableTo,
        Vocabulary::DeclassException,
        Vocabulary::TypeOfExemptedSource,
        Vocabulary::NoticeType,
        Vocabulary::PocType,
    ];
}

/// One token with its availability window `[introduced, retired)`
#[derive(Debug, Clone, Copy)]
struct Entry {
    value: &'static str,
    introduced: DdmsVersion,
    retired: Option<DdmsVersion>,
}

impl Entry {
    fn applies_to(&self, version: DdmsVersion) -> bool {
        version >= self.introduced && self.retired.map_or(true, |r| version < r)
    }
}

const fn e(value: &'static str) -> Entry {
    Entry {
        value,
        introduced: DdmsVersion::V2_0,
        retired: None,
    }
}

const fn since(value: &'static str, introduced: DdmsVersion) -> Entry {
    Entry {
        value,
        introduced,
        retired: None,
    }
}

const fn until(value: &'static str, retired: DdmsVersion) -> Entry {
    Entry {
        value,
        introduced: DdmsVersion::V2_0,
        retired: Some(retired),
    }
}

use DdmsVersion::{V3_1, V4_0_1, V4_1};

const CLASSIFICATION: &[Entry] = &[
    e("U"),
    e("C"),
    e("S"),
    e("TS"),
    e("R"),
    e("CTS"),
    e("CTS-B"),
    e("CTS-BALK"),
    e("NU"),
    e("NR"),
    e("NC"),
    e("NS"),
    until("NS-S", V3_1),
    until("NS-A", V3_1),
    since("CTSA", V3_1),
    since("NSAT", V3_1),
    since("NCA", V3_1),
];

const OWNER_PRODUCER: &[Entry] = &[
    e("USA"),
    e("AUS"),
    e("CAN"),
    e("GBR"),
    e("NZL"),
    e("FRA"),
    e("DEU"),
    e("ITA"),
    e("ESP"),
    e("NLD"),
    e("NATO"),
    e("FVEY"),
    e("ACGU"),
    since("TEYE", V3_1),
    since("FGI", V3_1),
];

const RELEASABLE_TO: &[Entry] = &[
    e("USA"),
    e("AUS"),
    e("CAN"),
    e("GBR"),
    e("NZL"),
    e("FRA"),
    e("DEU"),
    e("ITA"),
    e("ESP"),
    e("NLD"),
    e("NATO"),
    e("FVEY"),
    e("ACGU"),
    since("TEYE", V3_1),
];

const SCI_CONTROLS: &[Entry] = &[
    e("HCS"),
    e("KDK"),
    e("SI"),
    e("SI-G"),
    e("TK"),
    until("SI-ECI", V4_1),
    since("EL", V3_1),
];

const DISSEMINATION_CONTROLS: &[Entry] = &[
    e("FOUO"),
    e("OC"),
    e("IMC"),
    e("NF"),
    e("PR"),
    e("REL"),
    e("RELIDO"),
    until("EYES", V4_1),
    until("DSEN", V4_0_1),
    since("SAMI", V3_1),
    since("FISA", V3_1),
    since("DISPLAYONLY", V4_0_1),
];

const NON_IC_MARKINGS: &[Entry] = &[
    e("DS"),
    e("XD"),
    e("ND"),
    e("SBU"),
    e("SBU-NF"),
    e("LES"),
    e("LES-NF"),
    e("SSI"),
    since("NNPI", V3_1),
];

const ATOMIC_ENERGY_MARKINGS: &[Entry] = &[
    since("RD", V3_1),
    since("RD-CNWDI", V3_1),
    since("FRD", V3_1),
    since("DCNI", V3_1),
    since("UCNI", V3_1),
    since("TFNI", V4_1),
];

const DECLASS_EXCEPTION: &[Entry] = &[
    e("25X1"),
    e("25X1-human"),
    e("25X2"),
    e("25X3"),
    e("25X4"),
    e("25X5"),
    e("25X6"),
    e("25X7"),
    e("25X8"),
    e("25X9"),
    e("AEA"),
    e("NATO"),
    e("NATO-AEA"),
    since("50X1-HUM", V4_0_1),
    since("50X2-WMD", V4_0_1),
];

const TYPE_OF_EXEMPTED_SOURCE: &[Entry] = &[
    e("OADR"),
    e("X1"),
    e("X2"),
    e("X3"),
    e("X4"),
    e("X5"),
    e("X6"),
    e("X7"),
    e("X8"),
];

const NOTICE_TYPE: &[Entry] = &[
    e("FISA"),
    e("IMC"),
    e("CNWDI"),
    e("RD"),
    e("FRD"),
    e("DS"),
    e("LES"),
    e("LES-NF"),
    e("DoD-Dist-A"),
    e("DoD-Dist-B"),
    e("DoD-Dist-C"),
    e("DoD-Dist-D"),
    e("DoD-Dist-E"),
    e("DoD-Dist-F"),
    e("DoD-Dist-X"),
    e("US-Person"),
    since("PRE13526ORCON", V4_1),
];

const POC_TYPE: &[Entry] = &[
    since("DoD-Dist-B", V4_1),
    since("DoD-Dist-C", V4_1),
    since("DoD-Dist-D", V4_1),
    since("DoD-Dist-E", V4_1),
    since("DoD-Dist-F", V4_1),
    since("DoD-Dist-X", V4_1),
    since("ICD-710", V4_1),
];

lazy_static::lazy_static! {
    /// (vocabulary, token) -> entry, built once
    static ref INDEX: HashMap<(Vocabulary, &'static str), Entry> = {
        let mut m = HashMap::new();
        for vocabulary in Vocabulary::ALL {
            for entry in vocabulary.entries() {
                m.insert((vocabulary, entry.value), *entry);
            }
        }
        m
    };
}

/// True if `value` is a legal token of `vocabulary` in `version`
pub fn is_member(vocabulary: Vocabulary, value: &str, version: DdmsVersion) -> bool {
    INDEX
        .get(&(vocabulary, value))
        .map_or(false, |entry| entry.applies_to(version))
}

/// All tokens of a vocabulary legal in `version`, in publication order
pub fn tokens(vocabulary: Vocabulary, version: DdmsVersion) -> Vec<&'static str> {
    vocabulary
        .entries()
        .iter()
        .filter(|entry| entry.applies_to(version))
        .map(|entry| entry.value)
        .collect()
}

/// Check one value against a vocabulary.
///
/// Returns `Ok(None)` for members. For non-members, returns an error under the
/// error policy and `Ok(Some(warning))` under the warning policy.
pub fn validate(
    vocabulary: Vocabulary,
    value: &str,
    ctx: &Context,
) -> Result<Option<ValidationMessage>> {
    if is_member(vocabulary, value, ctx.version) {
        return Ok(None);
    }

    let message = format!(
        "{} is not a valid enumeration token for this attribute, as specified in {}.",
        value,
        vocabulary.file_name()
    );
    if ctx.cve_as_errors() {
        Err(Error::invalid(message))
    } else {
        log::warn!("{} (DDMS {})", message, ctx.version);
        Ok(Some(ValidationMessage::warning(message)))
    }
}

/// Check every value of a token list, collecting warnings
pub fn validate_all(
    vocabulary: Vocabulary,
    values: &[String],
    ctx: &Context,
) -> Result<Vec<ValidationMessage>> {
    let mut warnings = Vec::new();
    for value in values {
        warnings.extend(validate(vocabulary, value, ctx)?);
    }
    Ok(warnings)
}
