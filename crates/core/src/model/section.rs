use std::fmt;

/// One of the six fixed study subjects.
///
/// The curriculum is static: every section maps to exactly one Drive folder,
/// and the set never changes at runtime.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Section {
    id: &'static str,
    label: &'static str,
    folder_id: &'static str,
}

const SECTIONS: [Section; 6] = [
    Section {
        id: "subject-a",
        label: "Qisas",
        folder_id: "1uKLo5IvIzvWj8-7YMThisCITBpJRceiD",
    },
    Section {
        id: "subject-b",
        label: "Nahw",
        folder_id: "1wff8EW8MdhibXBTS9ly8kvD8F24O79jn",
    },
    Section {
        id: "subject-c",
        label: "Sarf",
        folder_id: "1DYUFj7R1XYfgOD8GvXh9gNqtdNGbxgh7",
    },
    Section {
        id: "subject-d",
        label: "Quduri",
        folder_id: "1Ka86L_xKjWtRQ_TWgzsYp98y59FM4Xkv",
    },
    Section {
        id: "subject-e",
        label: "Quran",
        folder_id: "1vdesCROBmriPVl_wY3Vzz0DR0OwSeUyc",
    },
    Section {
        id: "subject-f",
        label: "Tarbiyyah",
        folder_id: "1KFcOSzeGjLOwAgwtzceob_24sRTKx5Jd",
    },
];

impl Section {
    /// All sections, in drawer order.
    #[must_use]
    pub fn all() -> &'static [Section] {
        &SECTIONS
    }

    /// Looks up a section by its route id (e.g. `subject-a`).
    #[must_use]
    pub fn find(id: &str) -> Option<&'static Section> {
        SECTIONS.iter().find(|section| section.id == id)
    }

    /// The default navigation target.
    #[must_use]
    pub fn first() -> &'static Section {
        &SECTIONS[0]
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn folder_id(&self) -> &'static str {
        self.folder_id
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Section({})", self.id)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
