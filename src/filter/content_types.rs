/// A known content type and the file extensions it is served under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentType {
    /// Short identifier (e.g. "png")
    pub name: &'static str,

    /// MIME type
    pub mime_type: &'static str,

    /// Human-readable description
    pub description: &'static str,

    /// File extensions including the leading dot
    pub extensions: &'static [&'static str],
}

const fn ct(
    name: &'static str,
    mime_type: &'static str,
    description: &'static str,
    extensions: &'static [&'static str],
) -> ContentType {
    ContentType {
        name,
        mime_type,
        description,
        extensions,
    }
}

/// Table of content types used to build the excluded-type groups
pub const CONTENT_TYPES: &[ContentType] = &[
    ct("abw", "application/x-abiword", "AbiWord", &[".abw"]),
    ct("arc", "application/x-freearc", "Archive document", &[".arc"]),
    ct("avi", "video/x-msvideo", "AVI: Audio Video Interleave", &[".avi"]),
    ct("azw", "application/vnd.amazon.ebook", "Amazon Kindle eBook format", &[".azw"]),
    ct("bin", "application/octet-stream", "Any kind of binary data", &[".bin"]),
    ct("bmp", "image/bmp", "Windows OS/2 Bitmap Graphics", &[".bmp"]),
    ct("bz", "application/x-bzip", "BZip archive", &[".bz"]),
    ct("bz2", "application/x-bzip2", "BZip2 archive", &[".bz2"]),
    ct("csh", "application/x-csh", "C-Shell script", &[".csh"]),
    ct("css", "text/css", "Cascading Style Sheets", &[".css"]),
    ct("csv", "text/csv", "Comma-separated values", &[".csv"]),
    ct("doc", "application/msword", "Microsoft Word", &[".doc"]),
    ct(
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "Microsoft Word (OpenXML)",
        &[".docx"],
    ),
    ct("eot", "application/vnd.ms-fontobject", "MS Embedded OpenType fonts", &[".eot"]),
    ct("epub", "application/epub+zip", "Electronic publication", &[".epub"]),
    ct("gz", "application/gzip", "GZip Compressed Archive", &[".gz"]),
    ct("gif", "image/gif", "Graphics Interchange Format", &[".gif"]),
    ct("html", "text/html", "HyperText Markup Language", &[".htm", ".html"]),
    ct("ico", "image/vnd.microsoft.icon", "Icon format", &[".ico"]),
    ct("ics", "text/calendar", "iCalendar format", &[".ics"]),
    ct("jar", "application/java-archive", "Java Archive", &[".jar"]),
    ct("jpeg", "image/jpeg", "JPEG images", &[".jpeg", ".jpg"]),
    ct("js", "text/javascript", "JavaScript", &[".js"]),
    ct("json", "application/json", "JSON format", &[".json"]),
    ct("jsonld", "application/ld+json", "JSON-LD format", &[".jsonld"]),
    ct("midi", "audio/midi", "Musical Instrument Digital Interface", &[".mid", ".midi"]),
    ct("mjs", "text/javascript", "JavaScript module", &[".mjs"]),
    ct("mp3", "audio/mpeg", "MP3 audio", &[".mp3"]),
    ct("mpeg", "video/mpeg", "MPEG Video", &[".mpeg"]),
    ct("mpkg", "application/vnd.apple.installer+xml", "Apple Installer Package", &[".mpkg"]),
    ct("odp", "application/vnd.oasis.opendocument.presentation", "OpenDocument presentation", &[".odp"]),
    ct("ods", "application/vnd.oasis.opendocument.spreadsheet", "OpenDocument spreadsheet", &[".ods"]),
    ct("odt", "application/vnd.oasis.opendocument.text", "OpenDocument text", &[".odt"]),
    ct("oga", "audio/ogg", "OGG audio", &[".oga"]),
    ct("ogv", "video/ogg", "OGG video", &[".ogv"]),
    ct("ogx", "application/ogg", "OGG", &[".ogx"]),
    ct("otf", "font/otf", "OpenType font", &[".otf"]),
    ct("png", "image/png", "Portable Network Graphics", &[".png"]),
    ct("pdf", "application/pdf", "Adobe Portable Document Format", &[".pdf"]),
    ct("php", "application/x-httpd-php", "Hypertext Preprocessor", &[".php"]),
    ct("ppt", "application/vnd.ms-powerpoint", "Microsoft PowerPoint", &[".ppt"]),
    ct(
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "Microsoft PowerPoint (OpenXML)",
        &[".pptx"],
    ),
    ct("rar", "application/x-rar-compressed", "RAR archive", &[".rar"]),
    ct("rtf", "application/rtf", "Rich Text Format", &[".rtf"]),
    ct("sh", "application/x-sh", "Bourne shell script", &[".sh"]),
    ct("svg", "image/svg+xml", "Scalable Vector Graphics", &[".svg"]),
    ct("swf", "application/x-shockwave-flash", "Adobe Flash document", &[".swf"]),
    ct("tar", "application/x-tar", "Tape Archive", &[".tar"]),
    ct("tiff", "image/tiff", "Tagged Image File Format", &[".tif", ".tiff"]),
    ct("ts", "video/mp2t", "MPEG transport stream", &[".ts"]),
    ct("ttf", "font/ttf", "TrueType Font", &[".ttf"]),
    ct("txt", "text/plain", "Plain text", &[".txt"]),
    ct("vsd", "application/vnd.visio", "Microsoft Visio", &[".vsd"]),
    ct("wav", "audio/wav", "Waveform Audio Format", &[".wav"]),
    ct("weba", "audio/webm", "WEBM audio", &[".weba"]),
    ct("webm", "video/webm", "WEBM video", &[".webm"]),
    ct("webp", "image/webp", "WEBP image", &[".webp"]),
    ct("woff", "font/woff", "Web Open Font Format", &[".woff"]),
    ct("woff2", "font/woff2", "Web Open Font Format 2", &[".woff2"]),
    ct("xhtml", "application/xhtml+xml", "XHTML", &[".xhtml"]),
    ct("xls", "application/vnd.ms-excel", "Microsoft Excel", &[".xls"]),
    ct(
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "Microsoft Excel (OpenXML)",
        &[".xlsx"],
    ),
    ct("xml", "application/xml", "XML", &[".xml"]),
    ct("xul", "application/vnd.mozilla.xul+xml", "XUL", &[".xul"]),
    ct("zip", "application/zip", "ZIP archive", &[".zip"]),
    ct("3gp", "video/3gpp", "3GPP audio/video container", &[".3gp"]),
    ct("3g2", "video/3gpp2", "3GPP2 audio/video container", &[".3g2"]),
    ct("7z", "application/x-7z-compressed", "7-zip archive", &[".7z"]),
];

/// Looks up a content type by its short name
pub fn content_type(name: &str) -> Option<&'static ContentType> {
    CONTENT_TYPES.iter().find(|t| t.name == name)
}
