use std::sync::Arc;

use crate::error::FirebaseError;

/// Firestore rejects document IDs and collection names longer than this.
const MAX_SEGMENT_BYTES: usize = 1500;

pub fn collection(name: impl Into<String>) -> CollectionReference {
    CollectionReference::new(name)
}

#[derive(Debug, Clone)]
pub struct DocumentReference(Arc<DocumentReferenceInner>);

#[derive(Debug, Clone)]
pub struct CollectionReference(Arc<CollectionReferenceInner>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct CollectionReferenceInner {
    parent: Option<DocumentReference>,
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DocumentReferenceInner {
    parent: CollectionReference,
    id: String,
}

impl CollectionReference {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self(Arc::new(CollectionReferenceInner {
            parent: None,
            name: collection_name.into(),
        }))
    }

    pub fn doc(&self, id: impl Into<String>) -> DocumentReference {
        DocumentReference(Arc::new(DocumentReferenceInner {
            parent: self.clone(),
            id: id.into(),
        }))
    }

    pub fn parent(&self) -> Option<DocumentReference> {
        self.0.parent.clone()
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }
}

impl DocumentReference {
    pub fn collection(&self, name: impl Into<String>) -> CollectionReference {
        CollectionReference(Arc::new(CollectionReferenceInner {
            parent: Some(self.clone()),
            name: name.into(),
        }))
    }

    pub fn parent(&self) -> CollectionReference {
        self.0.parent.clone()
    }

    pub fn id(&self) -> &str {
        &self.0.id
    }
}

impl PartialEq for CollectionReference {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for CollectionReference {}

impl PartialEq for DocumentReference {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for DocumentReference {}

/// Checks a single path segment (a collection name or a document ID) against
/// Firestore's naming constraints.
pub fn validate_segment(segment: &str) -> Result<(), String> {
    if segment.is_empty() {
        return Err("path segments cannot be empty".to_string());
    }
    if segment.contains('/') {
        return Err(format!("'{segment}' cannot contain a forward slash"));
    }
    if segment == "." || segment == ".." {
        return Err(format!("'{segment}' is not a valid identifier"));
    }
    if segment.len() >= 4 && segment.starts_with("__") && segment.ends_with("__") {
        return Err(format!("'{segment}' matches the reserved pattern __.*__"));
    }
    if segment.len() > MAX_SEGMENT_BYTES {
        return Err(format!(
            "identifiers cannot be longer than {MAX_SEGMENT_BYTES} bytes"
        ));
    }
    Ok(())
}

fn split_path(path: &str) -> Result<Vec<&str>, FirebaseError> {
    let invalid = |reason: String| FirebaseError::InvalidReference {
        path: path.to_string(),
        reason,
    };

    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Err(invalid("path is empty".to_string()));
    }

    let segments: Vec<&str> = trimmed.split('/').collect();
    for segment in &segments {
        validate_segment(segment).map_err(invalid)?;
    }

    Ok(segments)
}

impl TryFrom<&str> for CollectionReference {
    type Error = FirebaseError;

    /// Parses a path such as `shops/meamore/services_list`. Collection paths
    /// have an odd number of segments.
    fn try_from(path: &str) -> Result<Self, Self::Error> {
        let segments = split_path(path)?;
        if segments.len() % 2 == 0 {
            return Err(FirebaseError::InvalidReference {
                path: path.to_string(),
                reason: "a collection path must have an odd number of segments".to_string(),
            });
        }

        let mut collection_ref = CollectionReference::new(segments[0]);
        for pair in segments[1..].chunks(2) {
            collection_ref = collection_ref.doc(pair[0]).collection(pair[1]);
        }

        Ok(collection_ref)
    }
}

impl TryFrom<&str> for DocumentReference {
    type Error = FirebaseError;

    /// Parses a path such as `shops/meamore/services_list/en`. Document paths
    /// have an even number of segments.
    fn try_from(path: &str) -> Result<Self, Self::Error> {
        let invalid_parity = || FirebaseError::InvalidReference {
            path: path.to_string(),
            reason: "a document path must have an even number of segments".to_string(),
        };

        let (collection_path, id) = path
            .trim_matches('/')
            .rsplit_once('/')
            .ok_or_else(invalid_parity)?;
        validate_segment(id).map_err(|reason| FirebaseError::InvalidReference {
            path: path.to_string(),
            reason,
        })?;

        let collection_ref =
            CollectionReference::try_from(collection_path).map_err(|_| invalid_parity())?;
        Ok(collection_ref.doc(id))
    }
}

impl std::fmt::Display for CollectionReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0.parent {
            Some(doc) => write!(f, "{}/{}", doc, self.0.name),
            None => write!(f, "{}", self.0.name),
        }
    }
}

impl std::fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0.parent, self.0.id)
    }
}
