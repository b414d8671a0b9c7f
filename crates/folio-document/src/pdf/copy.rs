// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page copying between lopdf documents.
//
// A page is copied together with every object it transitively references.
// Each source object is copied at most once per copy operation, which also
// breaks reference cycles (page -> annotation -> page).

use std::collections::HashMap;

use folio_core::error::FolioError;
use lopdf::{Dictionary, Document, Object, ObjectId};

use super::pdf_error;

/// Page attributes that may be inherited from ancestor `/Pages` nodes.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Ancestor walk limit; malformed files can contain parent cycles.
const MAX_TREE_DEPTH: usize = 64;

struct ObjectCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self {
            source,
            target,
            id_map: HashMap::new(),
        }
    }

    /// Copy `source_id` into the target, returning its new id.
    fn copy_object(&mut self, source_id: ObjectId) -> Result<ObjectId, FolioError> {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return Ok(*target_id);
        }

        // Reserve the id before recursing so cycles resolve to it.
        let new_id = self.target.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);

        let object = match self.source.get_object(source_id) {
            Ok(object) => object.clone(),
            Err(err) => {
                tracing::warn!(?source_id, %err, "Cannot resolve reference, using Null");
                Object::Null
            }
        };
        let remapped = self.remap(object)?;
        self.target.objects.insert(new_id, remapped);
        Ok(new_id)
    }

    fn remap(&mut self, object: Object) -> Result<Object, FolioError> {
        match object {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(id)?)),
            Object::Array(items) => Ok(Object::Array(
                items
                    .into_iter()
                    .map(|item| self.remap(item))
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.remap_dict(dict)?)),
            Object::Stream(mut stream) => {
                stream.dict = self.remap_dict(stream.dict)?;
                Ok(Object::Stream(stream))
            }
            other => Ok(other),
        }
    }

    fn remap_dict(&mut self, dict: Dictionary) -> Result<Dictionary, FolioError> {
        let mut remapped = Dictionary::new();
        for (key, value) in dict.iter() {
            let value = self.remap(value.clone())?;
            remapped.set(key.clone(), value);
        }
        Ok(remapped)
    }
}

/// Look up an inheritable attribute on the page or its ancestors.
pub(crate) fn inherited_attribute(
    document: &Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<Object> {
    let mut current = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = document.get_object(current).ok()?.as_dict().ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        current = dict.get(b"Parent").ok()?.as_reference().ok()?;
    }
    None
}

/// Copy `page_id` from `source` into `target`, appending it as the last kid of
/// `target_pages`. Inherited attributes are materialised on the copy so it no
/// longer depends on the source page tree.
pub(crate) fn copy_page(
    source: &Document,
    page_id: ObjectId,
    target: &mut Document,
    target_pages: ObjectId,
) -> Result<ObjectId, FolioError> {
    let mut page = source
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(pdf_error("cannot read source page"))?
        .clone();

    page.remove(b"Parent");
    for key in INHERITABLE {
        if !page.has(key) {
            if let Some(value) = inherited_attribute(source, page_id, key) {
                page.set(key.to_vec(), value);
            }
        }
    }

    let mut copier = ObjectCopier::new(source, target);
    let new_id = copier.target.add_object(Object::Null);
    copier.id_map.insert(page_id, new_id);
    let mut page = copier.remap_dict(page)?;
    page.set("Parent", Object::Reference(target_pages));
    target.objects.insert(new_id, Object::Dictionary(page));

    let pages = target
        .get_object_mut(target_pages)
        .and_then(Object::as_dict_mut)
        .map_err(pdf_error("target has no page tree"))?;
    match pages.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => kids.push(Object::Reference(new_id)),
        _ => pages.set("Kids", Object::Array(vec![Object::Reference(new_id)])),
    }
    let count = match pages.get(b"Count") {
        Ok(Object::Integer(count)) => *count,
        _ => 0,
    };
    pages.set("Count", Object::Integer(count + 1));

    Ok(new_id)
}
