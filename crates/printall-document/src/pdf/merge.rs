// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF merge — splice the page trees of several PDF files into one document
// with `lopdf`, keeping page order.

use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};
use printall_core::error::PrintAllError;
use tracing::{debug, info, instrument};

use super::reader::PdfReader;

/// Page attributes a page may inherit from its page tree root.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Concatenate `inputs` into one PDF at `output` and return its page count.
///
/// Inputs are loaded one at a time; their streams are copied as stored, so
/// the merged document holds compressed page content only.
#[instrument(skip_all, fields(inputs = inputs.len(), output = %output.display()))]
pub fn merge_files(inputs: &[PathBuf], output: &Path) -> Result<u32, PrintAllError> {
    if inputs.is_empty() {
        return Err(PrintAllError::PdfError("nothing to merge".into()));
    }

    let mut merged = Document::with_version("1.5");
    let tree_id = merged.new_object_id();
    let mut kids = Vec::new();

    for path in inputs {
        let mut doc = PdfReader::open(path)?.into_document();
        doc.renumber_objects_with(merged.max_id + 1);
        merged.max_id = doc.max_id;

        let (root_id, source_tree_id) = page_tree_root(&doc, path)?;
        let inherited: Vec<(Vec<u8>, Object)> = doc
            .get_dictionary(source_tree_id)
            .map(|tree| {
                INHERITABLE
                    .iter()
                    .filter_map(|key| tree.get(key).ok().map(|value| (key.to_vec(), value.clone())))
                    .collect()
            })
            .unwrap_or_default();
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

        for (id, object) in doc.objects {
            if id != root_id && id != source_tree_id {
                merged.objects.insert(id, object);
            }
        }

        for id in page_ids {
            if let Some(Object::Dictionary(page)) = merged.objects.get_mut(&id) {
                page.set("Parent", Object::Reference(tree_id));
                for (key, value) in &inherited {
                    if !page.has(key) {
                        page.set(key.clone(), value.clone());
                    }
                }
                kids.push(Object::Reference(id));
            }
        }
        debug!(path = %path.display(), pages = kids.len(), "Pages appended");
    }

    let page_count = kids.len() as u32;
    let mut tree = Dictionary::new();
    tree.set("Type", Object::Name(b"Pages".to_vec()));
    tree.set("Count", Object::Integer(i64::from(page_count)));
    tree.set("Kids", Object::Array(kids));
    merged.objects.insert(tree_id, Object::Dictionary(tree));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(tree_id));
    let catalog_id = merged.add_object(Object::Dictionary(catalog));
    merged.trailer.set("Root", Object::Reference(catalog_id));

    merged.save(output).map_err(|err| {
        PrintAllError::PdfError(format!("failed to write {}: {}", output.display(), err))
    })?;
    info!(pages = page_count, "PDFs merged");
    Ok(page_count)
}

/// Catalog and page tree root object ids of `doc`.
fn page_tree_root(doc: &Document, path: &Path) -> Result<(ObjectId, ObjectId), PrintAllError> {
    let malformed = |err: lopdf::Error| {
        PrintAllError::PdfError(format!("{} has no page tree: {}", path.display(), err))
    };
    let root_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(malformed)?;
    let tree_id = doc
        .get_dictionary(root_id)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(malformed)?;
    Ok((root_id, tree_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::count_pages;
    use crate::pdf::writer::PdfWriter;
    use printall_core::PaperSize;

    #[test]
    fn pages_are_concatenated_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let writer = PdfWriter::new(PaperSize::A5, 36);
        let mut inputs = Vec::new();
        for (name, pages) in [("one.pdf", 1), ("two.pdf", 2), ("three.pdf", 3)] {
            let path = dir.path().join(name);
            writer.write_blank_to_file(pages, &path).unwrap();
            inputs.push(path);
        }

        let output = dir.path().join("all.pdf");
        assert_eq!(merge_files(&inputs, &output).unwrap(), 6);
        assert_eq!(count_pages(&output).unwrap(), 6);
        // Inputs are left alone.
        assert_eq!(count_pages(&inputs[1]).unwrap(), 2);
    }

    #[test]
    fn every_page_points_at_the_new_tree() {
        let dir = tempfile::tempdir().unwrap();
        let writer = PdfWriter::new(PaperSize::A5, 36);
        let inputs: Vec<PathBuf> = (0..2)
            .map(|n| {
                let path = dir.path().join(format!("p{n}.pdf"));
                writer.write_blank_to_file(1, &path).unwrap();
                path
            })
            .collect();
        let output = dir.path().join("all.pdf");
        merge_files(&inputs, &output).unwrap();

        let doc = PdfReader::open(&output).unwrap().into_document();
        let (_, tree_id) = page_tree_root(&doc, &output).unwrap();
        for page_id in doc.get_pages().into_values() {
            let parent = doc
                .get_dictionary(page_id)
                .unwrap()
                .get(b"Parent")
                .and_then(Object::as_reference)
                .unwrap();
            assert_eq!(parent, tree_id);
        }
    }

    #[test]
    fn nothing_to_merge_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("none.pdf");
        assert!(merge_files(&[], &output).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn unreadable_input_is_a_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.pdf");
        std::fs::write(&bogus, b"not a pdf").unwrap();
        let err = merge_files(&[bogus], &dir.path().join("out.pdf")).unwrap_err();
        assert!(matches!(err, PrintAllError::PdfError(_)));
    }
}
