/*!
Names of the error types and codes of the error message

The names are the protocol constants without prefix and underscores,
e.g. `OFPBIC_UNKNOWN_INST` is reported as `UNKNOWNINST`. Values outside
of the tables map to `UNKNOWN_TYPE` and `UNKNOWN_CODE`.
*/

use crate::openflow::version::Version;

pub const UNKNOWN_TYPE: &str = "UNKNOWN_TYPE";
pub const UNKNOWN_CODE: &str = "UNKNOWN_CODE";

/// Error type of experimenter errors in 1.3 and later
pub const EXPERIMENTER_ERROR: u16 = 0xffff;

type Table = &'static [(&'static str, &'static [&'static str])];

const OF10_ERRORS: Table = &[
    ("HELLOFAILED", &["INCOMPATIBLE", "EPERM"]),
    (
        "BADREQUEST",
        &[
            "BADVERSION",
            "BADTYPE",
            "BADSTAT",
            "BADVENDOR",
            "BADSUBTYPE",
            "EPERM",
            "BADLEN",
            "BUFFEREMPTY",
            "BUFFERUNKNOWN",
        ],
    ),
    (
        "BADACTION",
        &[
            "BADTYPE",
            "BADLEN",
            "BADVENDOR",
            "BADVENDORTYPE",
            "BADOUTPORT",
            "BADARGUMENT",
            "EPERM",
            "TOOMANY",
            "BADQUEUE",
        ],
    ),
    (
        "FLOWMODFAILED",
        &[
            "ALLTABLESFULL",
            "OVERLAP",
            "EPERM",
            "BADEMERGTIMEOUT",
            "BADCOMMAND",
            "UNSUPPORTED",
        ],
    ),
    ("PORTMODFAILED", &["BADPORT", "BADHWADDR"]),
    ("QUEUEOPFAILED", &["BADPORT", "BADQUEUE", "EPERM"]),
];

const OF13_ERRORS: Table = &[
    ("HELLOFAILED", &["INCOMPATIBLE", "EPERM"]),
    (
        "BADREQUEST",
        &[
            "BADVERSION",
            "BADTYPE",
            "BADMULTIPART",
            "BADEXPERIMENTER",
            "BADEXPTYPE",
            "EPERM",
            "BADLEN",
            "BUFFEREMPTY",
            "BUFFERUNKNOWN",
            "BADTABLEID",
            "ISSLAVE",
            "BADPORT",
            "BADPACKET",
            "MULTIPARTBUFFEROVERFLOW",
        ],
    ),
    (
        "BADACTION",
        &[
            "BADTYPE",
            "BADLEN",
            "BADEXPERIMENTER",
            "BADEXPTYPE",
            "BADOUTPORT",
            "BADARGUMENT",
            "EPERM",
            "TOOMANY",
            "BADQUEUE",
            "BADOUTGROUP",
            "MATCHINCONSISTENT",
            "UNSUPPORTEDORDER",
            "BADTAG",
            "BADSETTYPE",
            "BADSETLEN",
            "BADSETARGUMENT",
        ],
    ),
    (
        "BADINSTRUCTION",
        &[
            "UNKNOWNINST",
            "UNSUPINST",
            "BADTABLEID",
            "UNSUPMETADATA",
            "UNSUPMETADATAMASK",
            "BADEXPERIMENTER",
            "BADEXPTYPE",
            "BADLEN",
            "EPERM",
        ],
    ),
    (
        "BADMATCH",
        &[
            "BADTYPE",
            "BADLEN",
            "BADTAG",
            "BADDLADDRMASK",
            "BADNWADDRMASK",
            "BADWILDCARDS",
            "BADFIELD",
            "BADVALUE",
            "BADMASK",
            "BADPREREQ",
            "DUPFIELD",
            "EPERM",
        ],
    ),
    (
        "FLOWMODFAILED",
        &[
            "UNKNOWN",
            "TABLEFULL",
            "BADTABLEID",
            "OVERLAP",
            "EPERM",
            "BADTIMEOUT",
            "BADCOMMAND",
            "BADFLAGS",
        ],
    ),
    (
        "GROUPMODFAILED",
        &[
            "GROUPEXISTS",
            "INVALIDGROUP",
            "WEIGHTUNSUPPORTED",
            "OUTOFGROUPS",
            "OUTOFBUCKETS",
            "CHAININGUNSUPPORTED",
            "WATCHUNSUPPORTED",
            "LOOP",
            "UNKNOWNGROUP",
            "CHAINEDGROUP",
            "BADTYPE",
            "BADCOMMAND",
            "BADBUCKET",
            "BADWATCH",
            "EPERM",
        ],
    ),
    (
        "PORTMODFAILED",
        &["BADPORT", "BADHWADDR", "BADCONFIG", "BADADVERTISE", "EPERM"],
    ),
    ("TABLEMODFAILED", &["BADTABLE", "BADCONFIG", "EPERM"]),
    ("QUEUEOPFAILED", &["BADPORT", "BADQUEUE", "EPERM"]),
    ("SWITCHCONFIGFAILED", &["BADFLAGS", "BADLEN", "EPERM"]),
    ("ROLEREQUESTFAILED", &["STALE", "UNSUP", "BADROLE"]),
    (
        "METERMODFAILED",
        &[
            "UNKNOWN",
            "METEREXISTS",
            "INVALIDMETER",
            "UNKNOWNMETER",
            "BADCOMMAND",
            "BADFLAGS",
            "BADRATE",
            "BADBURST",
            "BADBAND",
            "BADBANDVALUE",
            "OUTOFMETERS",
            "OUTOFBANDS",
        ],
    ),
    (
        "TABLEFEATURESFAILED",
        &[
            "BADTABLE",
            "BADMETADATA",
            "BADTYPE",
            "BADLEN",
            "BADARGUMENT",
            "EPERM",
        ],
    ),
];

// Types added by 1.4, numbered from 14 on
const OF14_ADDED_ERRORS: Table = &[
    (
        "BADPROPERTY",
        &[
            "BADTYPE",
            "BADLEN",
            "BADVALUE",
            "TOOMANY",
            "DUPTYPE",
            "BADEXPERIMENTER",
            "BADEXPTYPE",
            "BADEXPVALUE",
            "EPERM",
        ],
    ),
    ("ASYNCCONFIGFAILED", &["INVALID", "UNSUPPORTED", "EPERM"]),
    (
        "FLOWMONITORFAILED",
        &[
            "UNKNOWN",
            "MONITOREXISTS",
            "INVALIDMONITOR",
            "UNKNOWNMONITOR",
            "BADCOMMAND",
            "BADFLAGS",
            "BADTABLEID",
            "BADOUT",
        ],
    ),
    (
        "BUNDLEFAILED",
        &[
            "UNKNOWN",
            "EPERM",
            "BADID",
            "BUNDLEEXIST",
            "BUNDLECLOSED",
            "OUTOFBUNDLES",
            "BADTYPE",
            "BADFLAGS",
            "MSGBADLEN",
            "MSGBADXID",
            "MSGUNSUP",
            "MSGCONFLICT",
            "MSGTOOMANY",
            "MSGFAILED",
            "TIMEOUT",
            "BUNDLEINPROGRESS",
        ],
    ),
];

fn lookup(version: Version, typ: u16) -> Option<&'static (&'static str, &'static [&'static str])> {
    let typ = typ as usize;
    match version {
        Version::V1_0 => OF10_ERRORS.get(typ),
        Version::V1_3 => OF13_ERRORS.get(typ),
        Version::V1_4 | Version::V1_5 => OF13_ERRORS
            .get(typ)
            .or_else(|| OF14_ADDED_ERRORS.get(typ.checked_sub(OF13_ERRORS.len())?)),
    }
}

/// Returns the name of error type `typ`, or `UNKNOWN_TYPE`.
pub fn type_name(version: Version, typ: u16) -> &'static str {
    lookup(version, typ).map(|&(name, _)| name).unwrap_or(UNKNOWN_TYPE)
}

/// Returns the name of `code` within error type `typ`, or `UNKNOWN_CODE`
/// for an unknown code or an unknown type.
pub fn code_name(version: Version, typ: u16, code: u16) -> &'static str {
    lookup(version, typ)
        .and_then(|&(_, codes)| codes.get(code as usize))
        .cloned()
        .unwrap_or(UNKNOWN_CODE)
}
