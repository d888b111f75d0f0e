/// User-settable track columns.
///
/// This is the single place where column names are bound to `Track` fields.
/// Row readers resolve header cells through it, and the rename mask
/// vocabulary is exactly the set of names listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Filename,
    AlbumArtist,
    AlbumTitle,
    Artist,
    Composer,
    Copyright,
    Description,
    DiscNumber,
    Genre,
    TrackNo,
    Subtitle,
    Summary,
    Title,
    Year,
}

impl Field {
    /// Every field, in column order
    pub const ALL: [Field; 14] = [
        Field::Filename,
        Field::AlbumArtist,
        Field::AlbumTitle,
        Field::Artist,
        Field::Composer,
        Field::Copyright,
        Field::Description,
        Field::DiscNumber,
        Field::Genre,
        Field::TrackNo,
        Field::Subtitle,
        Field::Summary,
        Field::Title,
        Field::Year,
    ];

    /// Canonical column / mask name
    pub fn name(self) -> &'static str {
        match self {
            Field::Filename => "filename",
            Field::AlbumArtist => "album_artist",
            Field::AlbumTitle => "album_title",
            Field::Artist => "artist",
            Field::Composer => "composer",
            Field::Copyright => "copyright",
            Field::Description => "description",
            Field::DiscNumber => "disc_number",
            Field::Genre => "genre",
            Field::TrackNo => "track_no",
            Field::Subtitle => "subtitle",
            Field::Summary => "summary",
            Field::Title => "title",
            Field::Year => "year",
        }
    }

    /// Alternative names accepted for the same field
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::TrackNo => &["track"],
            _ => &[],
        }
    }

    /// Canonical name followed by aliases
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name()).chain(self.aliases().iter().copied())
    }

    /// Look a field up by column name (case-insensitive, surrounding whitespace ignored)
    pub fn from_name(name: &str) -> Option<Field> {
        let name = name.trim();
        Field::ALL
            .into_iter()
            .find(|field| field.names().any(|n| n.eq_ignore_ascii_case(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Field::from_name("title"), Some(Field::Title));
        assert_eq!(Field::from_name(" Album_Artist "), Some(Field::AlbumArtist));
        assert_eq!(Field::from_name("track"), Some(Field::TrackNo));
        assert_eq!(Field::from_name("track_no"), Some(Field::TrackNo));
        assert_eq!(Field::from_name("bpm"), None);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = Field::ALL.iter().flat_map(|f| f.names()).collect();
        let count = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), count);
    }
}
