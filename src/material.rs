//! Terrain material table.
//!
//! Each material is bound to one channel of the masking raster, so the table
//! holds at most [`MAX_MATERIALS`] entries. Material contents (textures,
//! shading parameters) belong to the material store and travel through this
//! crate as an opaque payload.

/// Number of blend layers in the masking raster.
pub const MAX_MATERIALS: usize = 4;

/// A material descriptor bound to a masking layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Material {
    /// Masking layer this material is blended by (0..=3)
    index: u8,
    /// Display name
    pub name: String,
    /// Material store record, round-tripped untouched
    pub payload: Vec<u8>,
}

impl Material {
    pub fn new(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            index: 0,
            name: name.into(),
            payload,
        }
    }

    /// Masking layer index assigned by the owning table.
    pub fn index(&self) -> u8 {
        self.index
    }

    pub(crate) fn with_index(mut self, index: u8) -> Self {
        self.index = index;
        self
    }
}

/// Fixed-capacity material list, filled front to back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialTable {
    slots: [Option<Material>; MAX_MATERIALS],
    len: usize,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from decoded materials, reassigning indices by position.
    ///
    /// Returns None when more than [`MAX_MATERIALS`] are given.
    pub fn from_materials(materials: Vec<Material>) -> Option<Self> {
        if materials.len() > MAX_MATERIALS {
            return None;
        }

        let mut table = Self::new();
        for material in materials {
            table.push(material);
        }
        Some(table)
    }

    /// Append a material. Returns false (and leaves the table unchanged)
    /// when all layers are taken.
    pub fn push(&mut self, mut material: Material) -> bool {
        if self.is_full() {
            return false;
        }

        material = material.with_index(self.len as u8);
        self.slots[self.len] = Some(material);
        self.len += 1;
        true
    }

    /// Replace the material at `index`, keeping its layer binding.
    ///
    /// # Panics
    /// If `index` is not an occupied slot.
    pub fn set(&mut self, index: usize, mut material: Material) {
        assert!(
            index < self.len,
            "material index {} out of range (count {})",
            index,
            self.len
        );
        material.index = index as u8;
        self.slots[index] = Some(material);
    }

    pub fn get(&self, index: usize) -> Option<&Material> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == MAX_MATERIALS
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    /// Clone the materials out in layer order.
    pub fn to_vec(&self) -> Vec<Material> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mat(name: &str) -> Material {
        Material::new(name, name.as_bytes().to_vec())
    }

    #[test]
    fn test_push_assigns_layer_indices() {
        let mut table = MaterialTable::new();
        assert!(table.push(mat("grass")));
        assert!(table.push(mat("rock")));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0).unwrap().index(), 0);
        assert_eq!(table.get(1).unwrap().index(), 1);
        assert_eq!(table.get(1).unwrap().name, "rock");
    }

    #[test]
    fn test_cap_at_four() {
        let mut table = MaterialTable::new();
        for name in ["a", "b", "c", "d"] {
            assert!(table.push(mat(name)));
        }
        assert!(table.is_full());
        assert!(!table.push(mat("e")));
        assert_eq!(table.len(), MAX_MATERIALS);
        assert_eq!(table.get(3).unwrap().name, "d");
    }

    #[test]
    fn test_from_materials_rejects_overflow() {
        let five = (0..5).map(|i| mat(&i.to_string())).collect();
        assert!(MaterialTable::from_materials(five).is_none());

        let three: Vec<_> = (0..3).map(|i| mat(&i.to_string())).collect();
        let table = MaterialTable::from_materials(three.clone()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(2).unwrap().index(), 2);
    }

    #[test]
    fn test_set_keeps_binding() {
        let mut table = MaterialTable::new();
        table.push(mat("grass"));
        table.push(mat("rock"));

        table.set(1, mat("snow"));
        let snow = table.get(1).unwrap();
        assert_eq!(snow.name, "snow");
        assert_eq!(snow.index(), 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_set_unoccupied_panics() {
        let mut table = MaterialTable::new();
        table.push(mat("grass"));
        table.set(2, mat("snow"));
    }
}
