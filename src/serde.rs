use crate::SkipList;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl<T: Serialize, G> Serialize for SkipList<T, G> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T: Deserialize<'de> + Ord> Deserialize<'de> for SkipList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let eles: Vec<T> = Deserialize::deserialize(deserializer)?;
        let mut sk: SkipList<T> = eles.into_iter().collect();
        sk.relevel();
        Ok(sk)
    }
}

#[cfg(test)]
mod test_serde {
    use crate::SkipList;
    use serde_json;
    #[test]
    fn test_serde() {
        let mut s = SkipList::with_seed(3, 4);
        for i in (0..10u32).rev() {
            s.insert(i);
        }
        let ser = serde_json::to_string(&s).expect("Failed to serialize!");
        assert_eq!(ser, "[0,1,2,3,4,5,6,7,8,9]");
        let back: SkipList<u32> = serde_json::from_str(&ser).expect("Failed to deserialize!");
        back.validate().unwrap();
        assert_eq!(s, back);
    }
}
