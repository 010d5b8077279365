/// Most frequent leaked passwords, lower-cased. Checked case-insensitively.
pub(super) const COMMON_PASSWORDS: &[&str] = &[
    "123456", "password", "12345678", "qwerty", "123456789", "12345", "1234", "111111",
    "1234567", "dragon", "123123", "baseball", "abc123", "football", "monkey", "letmein",
    "696969", "shadow", "master", "666666", "qwertyuiop", "123321", "mustang", "1234567890",
    "michael", "654321", "superman", "1qaz2wsx", "7777777", "121212", "000000", "qazwsx",
    "123qwe", "killer", "trustno1", "jordan", "jennifer", "zxcvbnm", "asdfgh", "hunter",
    "buster", "soccer", "harley", "batman", "andrew", "tigger", "sunshine", "iloveyou",
    "2000", "charlie", "robert", "thomas", "hockey", "ranger", "daniel", "starwars",
    "klaster", "112233", "george", "computer", "michelle", "jessica", "pepper", "1111",
    "zxcvbn", "555555", "11111111", "131313", "freedom", "777777", "pass", "maggie",
    "159753", "aaaaaa", "ginger", "princess", "joshua", "cheese", "amanda", "summer",
    "love", "ashley", "nicole", "chelsea", "biteme", "matthew", "access", "yankees",
    "987654321", "dallas", "austin", "thunder", "taylor", "matrix", "password1",
    "password123", "welcome", "welcome1", "admin", "admin123", "login", "passw0rd",
    "qwerty123", "qwerty1", "abc12345", "baseball1", "football1", "iloveyou1",
    "letmein1", "monkey1", "sunshine1", "princess1", "azerty", "azertyuiop", "motdepasse",
    "soleil", "bonjour", "doudou", "chouchou", "loulou", "marseille", "nicolas",
    "julien", "camille", "coucou", "changeme", "secret", "whatever", "trustme",
    "starwars1", "dragon1", "master1", "hello123", "qwe123", "1q2w3e4r", "1q2w3e",
    "q1w2e3r4", "zaq12wsx", "p@ssw0rd", "p@ssword", "passpass", "test1234", "test123",
    "default", "guest", "root", "toor", "letmein123", "abcdefgh", "abcdef", "abcd1234",
    "aa123456", "a123456", "123456a", "12341234", "88888888", "87654321", "00000000",
];
