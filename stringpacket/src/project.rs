//! The on-disk project: a base directory holding one directory per locale.
//!
//! ```text
//! <base>/
//!   stringpacket.toml        optional
//!   TranslationPacket.tsv    written by build_worksheet
//!   es.html                  deliverables
//!   en/JSON/…  en/Android/…  en/iOS/…
//!   es/JSON/…  es/Android/…  es/iOS/…
//! ```

use std::path::{Path, PathBuf};

use crate::{
    cleaner::{CleanReport, Cleaner},
    config::Config,
    deliverable::{Deliverable, read_deliverable},
    error::Error,
    formats::{Container, FileFormat},
    fsutil::write_atomic,
    merge::merge_with_report,
    packet::{Packet, PacketBuilder},
    tree::SourceTree,
    types::FileIdentifier,
    worksheet::write_worksheet,
};

const DELIVERABLE_EXTENSION: &str = "html";

#[derive(Debug, Clone)]
pub struct Project {
    base: PathBuf,
    config: Config,
    tree: Option<SourceTree>,
}

impl Project {
    /// A project rooted at `base`. Nothing is read until it is needed.
    pub fn new<P: Into<PathBuf>>(base: P, config: Config) -> Self {
        Self {
            base: base.into(),
            config,
            tree: None,
        }
    }

    /// A project rooted at `base` with its template tree loaded.
    pub fn open<P: Into<PathBuf>>(base: P, config: Config) -> Result<Self, Error> {
        let mut project = Self::new(base, config);
        project.source_tree()?;
        Ok(project)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `<base>/<template_locale>`
    pub fn template_dir(&self) -> PathBuf {
        self.base.join(&self.config.template_locale)
    }

    pub fn source_tree(&mut self) -> Result<&SourceTree, Error> {
        let tree = match self.tree.take() {
            Some(tree) => tree,
            None => {
                let dir = self.template_dir();
                let tree = SourceTree::load(&dir, &self.config.json)?;
                tracing::debug!(
                    dir = %dir.display(),
                    files = tree.file_count(),
                    strings = tree.entry_count(),
                    "loaded source tree"
                );
                tree
            }
        };
        Ok(self.tree.insert(tree))
    }

    pub fn build_packet(&mut self) -> Result<Packet, Error> {
        let tree = self.source_tree()?;
        Ok(PacketBuilder::new().build(tree))
    }

    /// Builds the packet and writes it as the worksheet. Returns the path
    /// written and the number of rows.
    pub fn build_worksheet(&mut self) -> Result<(PathBuf, usize), Error> {
        let packet = self.build_packet()?;
        let path = write_worksheet(&self.base, &packet, &self.config.worksheet_file_name)?;
        Ok((path, packet.len()))
    }

    /// Imports one deliverable (HTML, or TSV by extension). `locale`
    /// overrides the locale taken from the file name. Returns the files
    /// written.
    pub fn import_deliverable<P: AsRef<Path>>(
        &mut self,
        path: P,
        locale: Option<&str>,
    ) -> Result<Vec<PathBuf>, Error> {
        let path = path.as_ref();
        let (locale, deliverable) =
            read_deliverable(path, locale, &self.config.template_locale)?;
        tracing::info!(path = %path.display(), %locale, "importing deliverable");
        self.apply(deliverable)
    }

    /// Imports every `*.html` file directly inside the base directory, in
    /// name order.
    pub fn import_deliverables(&mut self) -> Result<Vec<PathBuf>, Error> {
        let mut written = Vec::new();
        for path in self.deliverable_files()? {
            written.extend(self.import_deliverable(&path, None)?);
        }
        Ok(written)
    }

    pub fn deliverable_files(&self) -> Result<Vec<PathBuf>, Error> {
        let mut files = Vec::new();
        for dent in std::fs::read_dir(&self.base)? {
            let path = dent?.path();
            let is_deliverable = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(DELIVERABLE_EXTENSION));
            if path.is_file() && is_deliverable {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Merges parsed deliverable entries into the template files and writes
    /// one output file per identifier.
    pub fn apply(&mut self, deliverable: Deliverable) -> Result<Vec<PathBuf>, Error> {
        let template_locale = self.config.template_locale.clone();
        let tree = self.source_tree()?;

        let mut outputs = Vec::with_capacity(deliverable.len());
        for (id, incoming) in deliverable {
            let container = match tree.get(id.format, &id.file_path) {
                Some(template) => {
                    let mut container = if id.locale == template_locale {
                        template.clone()
                    } else {
                        template.clone().into_translatable()
                    };
                    let (merged, report) = merge_with_report(container.entries(), incoming);
                    tracing::debug!(
                        file = %id,
                        updated = report.updated,
                        kept = report.kept,
                        added = report.added,
                        untranslated = report.untranslated,
                        "merged"
                    );
                    *container.entries_mut() = merged;
                    container
                }
                None if id.format == FileFormat::Json => {
                    return Err(Error::UnsupportedFormat(format!(
                        "{id}: no JSON template to write translations into"
                    )));
                }
                None => Container::Entries(incoming),
            };
            let bytes = container
                .encode(id.format)
                .map_err(|e| e.in_file(id.to_string()))?;
            outputs.push((id, bytes));
        }

        let mut written = Vec::with_capacity(outputs.len());
        for (id, bytes) in outputs {
            written.push(self.write_output(&id, &bytes)?);
        }
        Ok(written)
    }

    fn write_output(&self, id: &FileIdentifier, bytes: &[u8]) -> Result<PathBuf, Error> {
        let path = self.base.join(id.relative_output_path());
        write_atomic(&path, bytes).map_err(|e| e.in_file(path.display().to_string()))?;
        tracing::info!(path = %path.display(), locale = %id.locale, format = %id.format, "wrote");
        Ok(path)
    }

    /// Cleans the template tree in place. The cached tree is dropped since
    /// the files on disk changed.
    pub fn clean_source(&mut self) -> Result<CleanReport, Error> {
        let report = Cleaner::new(self.config.cleaner.clone()).clean_tree(self.template_dir())?;
        self.tree = None;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NO_TRANSLATION, StringEntry};
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn sample(root: &Path) {
        write(
            root,
            "en/Android/values/strings.xml",
            r#"<resources>
    <string name="hi">Hi</string>
    <string name="app_id" translatable="false">org.example</string>
    <string name="bye">Bye</string>
</resources>"#,
        );
        write(root, "en/iOS/Localizable.strings", "\"Hi\" = \"Hi\";\n");
        write(root, "en/JSON/intro.json", r#"{"id": "intro", "title": "Hi"}"#);
    }

    #[test]
    fn test_build_worksheet() {
        let dir = TempDir::new().unwrap();
        sample(dir.path());
        let mut project = Project::open(dir.path(), Config::default()).unwrap();
        let (path, rows) = project.build_worksheet().unwrap();
        assert_eq!(path, dir.path().join("TranslationPacket.tsv"));
        assert_eq!(rows, 2);
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("intro.json\ttitle\tvalues/strings.xml\thi\tLocalizable.strings\t\tHi\t\t\n"));
    }

    #[test]
    fn test_apply_merges_into_template_and_writes_both_locales() {
        let dir = TempDir::new().unwrap();
        sample(dir.path());
        let mut project = Project::open(dir.path(), Config::default()).unwrap();

        let mut deliverable = Deliverable::new();
        for (locale, value) in [("en", "Hi"), ("es", "Hola")] {
            deliverable.insert(
                FileIdentifier::new("values/strings.xml", FileFormat::Android, locale),
                vec![StringEntry::new("hi", value)],
            );
            deliverable.insert(
                FileIdentifier::new("intro.json", FileFormat::Json, locale),
                vec![StringEntry::new("title", value)],
            );
        }
        let written = project.apply(deliverable).unwrap();
        assert_eq!(written.len(), 4);

        let es_xml = std::fs::read_to_string(dir.path().join("es/Android/values/strings.xml")).unwrap();
        assert!(es_xml.contains(r#"<string name="hi">Hola</string>"#));
        // Untouched template strings are carried over; fixed strings are not.
        assert!(es_xml.contains(r#"<string name="bye">Bye</string>"#));
        assert!(!es_xml.contains("app_id"));

        let en_xml = std::fs::read_to_string(dir.path().join("en/Android/values/strings.xml")).unwrap();
        assert!(en_xml.contains(r#"translatable="false""#));

        let es_json: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("es/JSON/intro.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(es_json["title"], "Hola");
        assert_eq!(es_json["id"], "intro");
    }

    #[test]
    fn test_apply_keeps_plurals_in_template() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "en/Android/strings.xml",
            r#"<resources>
    <string name="hi">Hi</string>
    <!-- Cart badge -->
    <plurals name="apples">
        <item quantity="one">One apple</item>
        <item quantity="other">%d apples</item>
    </plurals>
    <string-array name="days"><item>Mon</item><item>Tue</item></string-array>
</resources>"#,
        );
        let mut project = Project::open(dir.path(), Config::default()).unwrap();

        let mut deliverable = Deliverable::new();
        for (locale, value) in [("en", "Hi"), ("es", "Hola")] {
            deliverable.insert(
                FileIdentifier::new("strings.xml", FileFormat::Android, locale),
                vec![StringEntry::new("hi", value)],
            );
        }
        project.apply(deliverable).unwrap();

        let en_xml = std::fs::read_to_string(dir.path().join("en/Android/strings.xml")).unwrap();
        assert!(en_xml.contains(r#"<string name="hi">Hi</string>"#));
        assert!(en_xml.contains("<!-- Cart badge -->"));
        assert!(en_xml.contains(r#"<item quantity="other">%d apples</item>"#));
        assert!(en_xml.contains(
            r#"<string-array name="days"><item>Mon</item><item>Tue</item></string-array>"#
        ));

        let es_xml = std::fs::read_to_string(dir.path().join("es/Android/strings.xml")).unwrap();
        assert!(es_xml.contains(r#"<string name="hi">Hola</string>"#));
        assert!(!es_xml.contains("plurals"));
        assert!(!es_xml.contains("string-array"));
    }

    #[test]
    fn test_apply_without_template() {
        let dir = TempDir::new().unwrap();
        sample(dir.path());
        let mut project = Project::open(dir.path(), Config::default()).unwrap();

        let mut deliverable = Deliverable::new();
        deliverable.insert(
            FileIdentifier::new("Extra.strings", FileFormat::Ios, "fr"),
            vec![StringEntry::new("Later", "Plus tard"), StringEntry::new("Soon", NO_TRANSLATION)],
        );
        let written = project.apply(deliverable).unwrap();
        assert_eq!(written, vec![dir.path().join("fr/iOS/Extra.strings")]);
        let text = std::fs::read_to_string(&written[0]).unwrap();
        assert!(text.contains("\"Later\" = \"Plus tard\";"));
        assert!(text.contains("\"Soon\" = \"NO TRANSLATION FOUND\";"));

        let mut deliverable = Deliverable::new();
        deliverable.insert(
            FileIdentifier::new("missing.json", FileFormat::Json, "fr"),
            vec![StringEntry::new("title", "Salut")],
        );
        assert!(matches!(project.apply(deliverable), Err(Error::UnsupportedFormat(_))));
        assert!(!dir.path().join("fr/JSON/missing.json").exists());
    }

    #[test]
    fn test_clean_source_then_rebuild() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "en/Android/strings.xml",
            r#"<resources><string name="busy">We're <b>busy</b></string></resources>"#,
        );
        let mut project = Project::new(dir.path(), Config::default());
        let report = project.clean_source().unwrap();
        assert_eq!(report.rewritten, 1);

        let packet = project.build_packet().unwrap();
        assert_eq!(packet.rows()[0].english, "We’re <b>busy</b>");
    }

    #[test]
    fn test_deliverable_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "fr.html", "");
        write(dir.path(), "es.HTML", "");
        write(dir.path(), "notes.txt", "");
        write(dir.path(), "en/old.html", "");
        let project = Project::new(dir.path(), Config::default());
        assert_eq!(
            project.deliverable_files().unwrap(),
            vec![dir.path().join("es.HTML"), dir.path().join("fr.html")]
        );
    }
}
